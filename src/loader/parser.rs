use crate::error::{Error, Result};
use crate::utils::resolve_link;
use chrono::{DateTime, Utc};
use feed_rs::parser;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One renderable item belonging to a feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    /// Markup as published by the feed; sanitized when rendered
    pub body: String,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

impl Entry {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            link: None,
            published: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<Entry>,
}

/// Parse an RSS, Atom or JSON feed.
///
/// Relative entry links are resolved against `base_url`. Entries without a
/// title are dropped.
pub fn parse_feed(content: &str, base_url: &str) -> Result<ParsedFeed> {
    let feed = parser::parse(content.as_bytes())
        .map_err(|e| Error::FeedParse(format!("Failed to parse feed: {e}")))?;

    debug!(
        "Parsed feed: {}",
        feed.title
            .as_ref()
            .map(|t| t.content.as_str())
            .unwrap_or("Untitled")
    );

    let title = feed.title.map(|t| t.content);

    let entries = feed
        .entries
        .into_iter()
        .filter_map(|entry| match parse_entry(entry, base_url) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Failed to parse entry: {}", e);
                None
            }
        })
        .collect();

    Ok(ParsedFeed { title, entries })
}

fn parse_entry(entry: feed_rs::model::Entry, base_url: &str) -> Result<Entry> {
    let title = entry
        .title
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::FeedParse(format!("Entry {} missing title", entry.id)))?;

    // Full content wins over the summary, the page shows the whole post
    let body = entry
        .content
        .and_then(|c| c.body)
        .or_else(|| entry.summary.map(|s| s.content))
        .unwrap_or_default();

    let link = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref() == Some("alternate") || l.rel.is_none())
        .or_else(|| entry.links.first())
        .and_then(|l| resolve_link(&l.href, base_url));

    Ok(Entry {
        title,
        body,
        link,
        published: entry.published.or(entry.updated),
    })
}
