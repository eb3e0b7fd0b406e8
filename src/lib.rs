pub mod config;
pub mod error;

// Feed loading and rendering
pub mod loader;
pub mod menu;
pub mod render;

pub mod app;
pub mod cli;

// Utilities
pub mod utils;

// Re-exports
pub use app::FeedReader;
pub use config::{Feed, FeedCatalog, Settings};
pub use error::{Error, Result};
pub use loader::{Entry, FeedLoader, LoadReport};
pub use menu::MenuToggle;
pub use render::{MemorySurface, RenderSurface};
