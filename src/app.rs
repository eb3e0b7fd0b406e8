use crate::config::{FeedCatalog, Settings};
use crate::error::{Error, Result};
use crate::loader::{EntrySource, FeedLoader, LoadReport};
use crate::menu::MenuToggle;
use crate::render::RenderSurface;
use std::sync::Arc;
use tracing::info;

/// The reader page: catalogue, loader, surface and menu wired together
pub struct FeedReader {
    loader: Arc<FeedLoader>,
    surface: Arc<dyn RenderSurface>,
    menu: MenuToggle,
}

impl FeedReader {
    pub fn new(
        catalog: FeedCatalog,
        source: Arc<dyn EntrySource>,
        surface: Arc<dyn RenderSurface>,
    ) -> Self {
        let loader = FeedLoader::new(Arc::new(catalog), source, surface.clone());
        Self::with_loader(Arc::new(loader), surface)
    }

    pub fn with_loader(loader: Arc<FeedLoader>, surface: Arc<dyn RenderSurface>) -> Self {
        Self {
            loader,
            surface,
            menu: MenuToggle::new(),
        }
    }

    /// Wire up an HTTP-backed reader from settings
    pub fn from_settings(settings: &Settings, surface: Arc<dyn RenderSurface>) -> Result<Self> {
        let catalog = Arc::new(settings.catalog()?);
        info!("Feed catalogue loaded: {} feeds", catalog.len());

        let loader = FeedLoader::from_settings(settings, catalog, surface.clone())?;
        Ok(Self::with_loader(Arc::new(loader), surface))
    }

    /// Show the first feed, as the page does when it boots
    pub async fn start(&self) -> Result<LoadReport> {
        let first = self
            .loader
            .catalog()
            .first()
            .map(|f| f.id)
            .ok_or_else(|| Error::Internal("Feed catalogue is empty".to_string()))?;

        self.loader.load(first).await
    }

    pub async fn select(&self, feed_id: u32) -> Result<LoadReport> {
        self.loader.load(feed_id).await
    }

    /// Pick a feed from the menu: the menu closes, then the feed loads
    pub async fn select_from_menu(&mut self, feed_id: u32) -> Result<LoadReport> {
        if !self.menu.is_hidden() {
            self.menu.toggle();
        }
        self.loader.load(feed_id).await
    }

    pub async fn select_next(&self) -> Result<LoadReport> {
        self.loader.load_next().await
    }

    /// Activate the menu icon; returns whether the menu is hidden afterwards
    pub fn toggle_menu(&mut self) -> bool {
        self.menu.toggle()
    }

    pub fn menu(&self) -> &MenuToggle {
        &self.menu
    }

    pub fn catalog(&self) -> &FeedCatalog {
        self.loader.catalog()
    }

    pub fn loader(&self) -> &Arc<FeedLoader> {
        &self.loader
    }

    pub fn surface(&self) -> &Arc<dyn RenderSurface> {
        &self.surface
    }
}
