pub mod feeds;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use feeds::{Feed, FeedCatalog};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub feeds: FeedsConfig,
    pub fetcher: FetcherConfig,
    pub loader: LoaderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedsConfig {
    /// YAML catalogue to load; the builtin catalogue is used when unset
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    pub user_agent: String,
    pub max_feed_size: usize,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Upper bound for a feed's fetch; 0 disables it
    pub timeout_seconds: u64,
    pub max_entries: usize,
}

impl FetcherConfig {
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            max_feed_size: 5_242_880,
            max_retries: 3,
            initial_backoff_ms: 1000,
            request_timeout_seconds: 30,
        }
    }
}

impl LoaderConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 60,
            max_entries: 100,
        }
    }
}

fn default_user_agent() -> String {
    format!("Feedreader/{}", env!("CARGO_PKG_VERSION"))
}

fn env_or<T: std::str::FromStr>(name: &str, default: &str) -> Result<T> {
    std::env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {name} value")))
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let config_path = std::env::var("FEEDS_CONFIG_PATH").ok().map(PathBuf::from);

        let user_agent = std::env::var("USER_AGENT").unwrap_or_else(|_| default_user_agent());
        let max_feed_size = env_or("MAX_FEED_SIZE", "5242880")?;
        let max_retries = env_or("FETCH_MAX_RETRIES", "3")?;
        let initial_backoff_ms = env_or("FETCH_INITIAL_BACKOFF_MS", "1000")?;
        let request_timeout_seconds = env_or("FETCH_TIMEOUT_SECONDS", "30")?;

        let timeout_seconds = env_or("LOADER_TIMEOUT_SECONDS", "60")?;
        let max_entries = env_or("MAX_ENTRIES", "100")?;

        Ok(Settings {
            feeds: FeedsConfig { config_path },
            fetcher: FetcherConfig {
                user_agent,
                max_feed_size,
                max_retries,
                initial_backoff_ms,
                request_timeout_seconds,
            },
            loader: LoaderConfig {
                timeout_seconds,
                max_entries,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.max_feed_size == 0 {
            return Err(Error::Config("Max feed size must be non-zero".to_string()));
        }

        if self.fetcher.request_timeout_seconds == 0 {
            return Err(Error::Config(
                "Fetch timeout must be non-zero".to_string(),
            ));
        }

        if self.loader.max_entries == 0 {
            return Err(Error::Config("Max entries must be non-zero".to_string()));
        }

        Ok(())
    }

    /// Load the catalogue named by the settings, falling back to the builtin one
    pub fn catalog(&self) -> Result<FeedCatalog> {
        match &self.feeds.config_path {
            Some(path) => FeedCatalog::from_file(path),
            None => Ok(FeedCatalog::builtin()),
        }
    }
}
