// Feed loading: fetch a feed's entries and render them into a surface

pub mod fetcher;
pub mod parser;
pub mod source;

use crate::config::{Feed, FeedCatalog, LoaderConfig, Settings};
use crate::error::{Error, Result};
use crate::render::RenderSurface;
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub use parser::Entry;
pub use source::{EntrySource, HttpSource, StaticSource};

/// Outcome of a successful load
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub feed_id: u32,
    pub feed_name: String,
    pub entry_count: usize,
}

type OnComplete = Box<dyn FnOnce(Result<LoadReport>) + Send + 'static>;

struct LoadJob {
    feed_id: u32,
    on_complete: OnComplete,
}

/// Loads feeds from an [`EntrySource`] into a [`RenderSurface`].
///
/// Loads never overlap: each one holds the render gate from fetch until the
/// surface shows the new entries, so two feeds' entries are never mixed.
/// Callback-style loads are queued and run in call order.
///
/// A failed load (unknown id, fetch failure, timeout) leaves the surface
/// exactly as it was before the call.
pub struct FeedLoader {
    catalog: Arc<FeedCatalog>,
    source: Arc<dyn EntrySource>,
    surface: Arc<dyn RenderSurface>,
    timeout: Option<Duration>,
    gate: tokio::sync::Mutex<()>,
    current: Mutex<Option<u32>>,
    queue: OnceLock<mpsc::UnboundedSender<LoadJob>>,
}

impl FeedLoader {
    pub fn new(
        catalog: Arc<FeedCatalog>,
        source: Arc<dyn EntrySource>,
        surface: Arc<dyn RenderSurface>,
    ) -> Self {
        Self {
            catalog,
            source,
            surface,
            timeout: None,
            gate: tokio::sync::Mutex::new(()),
            current: Mutex::new(None),
            queue: OnceLock::new(),
        }
    }

    /// Build a loader that fetches over HTTP using `settings`
    pub fn from_settings(
        settings: &Settings,
        catalog: Arc<FeedCatalog>,
        surface: Arc<dyn RenderSurface>,
    ) -> Result<Self> {
        let source = HttpSource::new(&settings.fetcher, settings.loader.max_entries)?;
        Ok(Self::new(catalog, Arc::new(source), surface).with_config(&settings.loader))
    }

    pub fn with_config(self, config: &LoaderConfig) -> Self {
        Self {
            timeout: config.timeout(),
            ..self
        }
    }

    /// Fail loads whose fetch takes longer than `timeout`
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self
        }
    }

    pub fn catalog(&self) -> &FeedCatalog {
        &self.catalog
    }

    /// The feed whose entries are currently rendered
    pub fn current_feed(&self) -> Option<Feed> {
        let current = *self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.and_then(|id| self.catalog.get(id).cloned())
    }

    /// Load `feed_id` and invoke `on_complete` exactly once when done.
    ///
    /// On success the callback runs after the surface fully reflects the new
    /// entries. Errors are handed to the callback too. Must be called from
    /// within a tokio runtime.
    pub fn load_feed<F>(self: &Arc<Self>, feed_id: u32, on_complete: F)
    where
        F: FnOnce(Result<LoadReport>) + Send + 'static,
    {
        let job = LoadJob {
            feed_id,
            on_complete: Box::new(on_complete),
        };

        let queue = self.queue.get_or_init(|| self.spawn_worker());
        if let Err(mpsc::error::SendError(job)) = queue.send(job) {
            complete(
                job,
                Err(Error::Internal("Feed load queue closed".to_string())),
            );
        }
    }

    /// Load `feed_id` and wait for it to be rendered
    pub async fn load(&self, feed_id: u32) -> Result<LoadReport> {
        let _gate = self.gate.lock().await;

        match self.load_locked(feed_id).await {
            Ok(report) => {
                info!(
                    "Loaded feed {} ({}): {} entries",
                    report.feed_id, report.feed_name, report.entry_count
                );
                Ok(report)
            }
            Err(e) => {
                warn!("Failed to load feed {}: {}", feed_id, e.log_safe());
                Err(e)
            }
        }
    }

    /// Load the feed after the current one, wrapping around the catalogue.
    /// With nothing loaded yet this loads the first feed.
    pub async fn load_next(&self) -> Result<LoadReport> {
        let next = match self.current_feed() {
            Some(current) => self.catalog.next_after(current.id),
            None => self.catalog.first(),
        };

        let feed_id = next
            .map(|f| f.id)
            .ok_or_else(|| Error::Internal("Feed catalogue is empty".to_string()))?;

        self.load(feed_id).await
    }

    async fn load_locked(&self, feed_id: u32) -> Result<LoadReport> {
        let feed = self
            .catalog
            .get(feed_id)
            .ok_or(Error::UnknownFeedId(feed_id))?;

        debug!(
            "Fetching entries for {} from {} source",
            feed.name,
            self.source.source_type()
        );

        let fetch = self.source.fetch_entries(feed);
        let entries = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .map_err(|_| Error::Timeout(limit))??,
            None => fetch.await?,
        };

        let entry_count = entries.len();
        self.surface.replace(&feed.name, entries);
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = Some(feed.id);

        Ok(LoadReport {
            feed_id: feed.id,
            feed_name: feed.name.clone(),
            entry_count,
        })
    }

    fn spawn_worker(self: &Arc<Self>) -> mpsc::UnboundedSender<LoadJob> {
        let (tx, mut rx) = mpsc::unbounded_channel::<LoadJob>();
        // Weak so the queue does not keep the loader alive
        let loader = Arc::downgrade(self);

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let result = match loader.upgrade() {
                    // A panicking source must not take the queue down with it
                    Some(loader) => {
                        let feed_id = job.feed_id;
                        tokio::spawn(async move { loader.load(feed_id).await })
                            .await
                            .unwrap_or_else(|e| {
                                error!("Load of feed {} panicked: {}", feed_id, e);
                                Err(Error::Internal("Feed load panicked".to_string()))
                            })
                    }
                    None => Err(Error::Internal("Feed loader dropped".to_string())),
                };
                complete(job, result);
            }
            debug!("Feed load queue closed");
        });

        tx
    }
}

fn complete(job: LoadJob, result: Result<LoadReport>) {
    let feed_id = job.feed_id;
    if catch_unwind(AssertUnwindSafe(|| (job.on_complete)(result))).is_err() {
        error!("Completion callback for feed {} panicked", feed_id);
    }
}
