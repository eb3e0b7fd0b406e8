use super::fetcher::Fetcher;
use super::parser::{parse_feed, Entry};
use crate::config::{Feed, FetcherConfig};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Where a feed's entries come from
#[async_trait]
pub trait EntrySource: Send + Sync {
    /// Retrieve the current entries of `feed`
    async fn fetch_entries(&self, feed: &Feed) -> Result<Vec<Entry>>;

    /// Source type name (for logging)
    fn source_type(&self) -> &'static str;
}

/// Fetches feeds over HTTP and parses them with feed-rs
pub struct HttpSource {
    fetcher: Fetcher,
    max_entries: usize,
}

impl HttpSource {
    pub fn new(config: &FetcherConfig, max_entries: usize) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(config)?,
            max_entries,
        })
    }
}

#[async_trait]
impl EntrySource for HttpSource {
    async fn fetch_entries(&self, feed: &Feed) -> Result<Vec<Entry>> {
        let fetched = self.fetcher.fetch(&feed.url).await.map_err(|e| match e {
            Error::FetchFailure(_) => e,
            other => Error::FetchFailure(other.log_safe()),
        })?;

        let parsed = parse_feed(&fetched.content, &feed.url)
            .map_err(|e| Error::FetchFailure(e.to_string()))?;

        let mut entries = parsed.entries;
        if entries.len() > self.max_entries {
            debug!(
                "Feed {} has {} entries, keeping the first {}",
                feed.name,
                entries.len(),
                self.max_entries
            );
            entries.truncate(self.max_entries);
        }

        Ok(entries)
    }

    fn source_type(&self) -> &'static str {
        "http"
    }
}

/// Serves fixed entries keyed by feed id; feeds without entries fail to fetch
#[derive(Debug, Default, Clone)]
pub struct StaticSource {
    entries: HashMap<u32, Vec<Entry>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, feed_id: u32, entries: Vec<Entry>) -> Self {
        self.entries.insert(feed_id, entries);
        self
    }
}

#[async_trait]
impl EntrySource for StaticSource {
    async fn fetch_entries(&self, feed: &Feed) -> Result<Vec<Entry>> {
        self.entries
            .get(&feed.id)
            .cloned()
            .ok_or_else(|| Error::FetchFailure(format!("No entries for {}", feed.name)))
    }

    fn source_type(&self) -> &'static str {
        "static"
    }
}
