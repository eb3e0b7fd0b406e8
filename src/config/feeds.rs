use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use url::Url;

/// A named, URL-addressed source of entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub id: u32,
    pub name: String,
    pub url: String,
}

impl Feed {
    pub fn new(id: u32, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            url: url.into(),
        }
    }
}

/// On-disk shape of a feed catalogue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub version: u32,
    pub feeds: Vec<Feed>,
    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_max_feeds")]
    pub max_feeds: usize,
    #[serde(default = "default_protocols")]
    pub allowed_protocols: Vec<String>,
    #[serde(default)]
    pub url_patterns: UrlPatterns,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_feeds: default_max_feeds(),
            allowed_protocols: default_protocols(),
            url_patterns: UrlPatterns::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UrlPatterns {
    #[serde(default)]
    pub allow: Vec<String>,
    #[serde(default)]
    pub deny: Vec<String>,
}

fn default_max_feeds() -> usize {
    1000
}

fn default_protocols() -> Vec<String> {
    vec!["https".to_string(), "http".to_string()]
}

/// Fixed, ordered collection of feeds owned by the composing application.
///
/// A catalogue is validated on construction and never changes afterwards,
/// so every `Feed` handed out has a unique id and non-empty name and url.
#[derive(Debug, Clone)]
pub struct FeedCatalog {
    feeds: Vec<Feed>,
}

impl FeedCatalog {
    /// Build a catalogue with the default validation rules
    pub fn new(feeds: Vec<Feed>) -> Result<Self> {
        Self::with_validation(feeds, &ValidationConfig::default())
    }

    pub fn with_validation(feeds: Vec<Feed>, validation: &ValidationConfig) -> Result<Self> {
        validate(&feeds, validation)?;
        Ok(Self { feeds })
    }

    /// Load a catalogue from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read feed catalogue from {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to load feed catalogue from {}: {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid catalogue YAML: {e}")))?;

        if file.version != 1 {
            return Err(Error::Config(format!(
                "Unsupported config version: {}. Expected version 1",
                file.version
            )));
        }

        Self::with_validation(file.feeds, &file.validation)
    }

    /// The feeds the reader ships with
    pub fn builtin() -> Self {
        Self {
            feeds: vec![
                Feed::new(0, "Udacity Blog", "http://blog.udacity.com/feed"),
                Feed::new(1, "CSS Tricks", "http://feeds.feedburner.com/CssTricks"),
                Feed::new(2, "HTML5 Rocks", "http://feeds.feedburner.com/html5rocks"),
                Feed::new(
                    3,
                    "Linear Digressions",
                    "http://feeds.feedburner.com/udacity-linear-digressions",
                ),
            ],
        }
    }

    pub fn get(&self, id: u32) -> Option<&Feed> {
        self.feeds.iter().find(|f| f.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Feed> {
        self.feeds.iter().find(|f| f.name == name)
    }

    /// The feed after `id` in catalogue order, wrapping around at the end
    pub fn next_after(&self, id: u32) -> Option<&Feed> {
        let pos = self.feeds.iter().position(|f| f.id == id)?;
        self.feeds.get((pos + 1) % self.feeds.len())
    }

    pub fn first(&self) -> Option<&Feed> {
        self.feeds.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feed> {
        self.feeds.iter()
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }
}

impl<'a> IntoIterator for &'a FeedCatalog {
    type Item = &'a Feed;
    type IntoIter = std::slice::Iter<'a, Feed>;

    fn into_iter(self) -> Self::IntoIter {
        self.feeds.iter()
    }
}

fn validate(feeds: &[Feed], validation: &ValidationConfig) -> Result<()> {
    if feeds.is_empty() {
        return Err(Error::Config(
            "Feed catalogue must contain at least one feed".to_string(),
        ));
    }

    if feeds.len() > validation.max_feeds {
        return Err(Error::Config(format!(
            "Too many feeds: {} > {}",
            feeds.len(),
            validation.max_feeds
        )));
    }

    let mut seen_ids = HashSet::new();
    let mut seen_urls = HashSet::new();
    for feed in feeds {
        if !seen_ids.insert(feed.id) {
            return Err(Error::Config(format!("Duplicate feed id: {}", feed.id)));
        }
        if !seen_urls.insert(&feed.url) {
            return Err(Error::Config(format!("Duplicate feed URL: {}", feed.url)));
        }
    }

    for feed in feeds {
        validate_feed(feed, validation)
            .map_err(|e| Error::Config(format!("Feed #{} ({}): {}", feed.id, feed.url, e)))?;
    }

    Ok(())
}

fn validate_feed(feed: &Feed, validation: &ValidationConfig) -> Result<()> {
    if feed.name.trim().is_empty() {
        return Err(Error::Validation("Feed name cannot be empty".to_string()));
    }

    if feed.url.trim().is_empty() {
        return Err(Error::Validation("Feed URL cannot be empty".to_string()));
    }

    let url = Url::parse(&feed.url)
        .map_err(|e| Error::Validation(format!("Invalid URL '{}': {}", feed.url, e)))?;

    if !validation
        .allowed_protocols
        .iter()
        .any(|p| p == url.scheme())
    {
        return Err(Error::Validation(format!(
            "Invalid protocol '{}'. Allowed protocols: {}",
            url.scheme(),
            validation.allowed_protocols.join(", ")
        )));
    }

    if url.host_str().is_none() {
        return Err(Error::Validation("URL must have a valid host".to_string()));
    }

    for pattern in &validation.url_patterns.deny {
        if matches_pattern(&feed.url, pattern) {
            return Err(Error::Validation(format!(
                "URL matches deny pattern: {pattern}"
            )));
        }
    }

    if !validation.url_patterns.allow.is_empty()
        && !validation
            .url_patterns
            .allow
            .iter()
            .any(|pattern| matches_pattern(&feed.url, pattern))
    {
        return Err(Error::Validation(format!(
            "URL does not match any allow patterns: {}",
            validation.url_patterns.allow.join(", ")
        )));
    }

    Ok(())
}

/// Check if a URL matches a simple glob pattern (`*` and `?`)
fn matches_pattern(url: &str, pattern: &str) -> bool {
    let regex_pattern = regex::escape(pattern)
        .replace(r"\*", ".*")
        .replace(r"\?", ".");

    regex::Regex::new(&format!("^{regex_pattern}$"))
        .map(|re| re.is_match(url))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
version: 1
feeds:
  - id: 0
    name: "Example Feed"
    url: "https://example.com/feed.xml"
  - id: 1
    name: "Other Feed"
    url: "https://other.example.com/rss"
"#;

        let file = create_test_config(config_content);
        let catalog = FeedCatalog::from_file(file.path()).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().name, "Example Feed");
        assert_eq!(catalog.get(1).unwrap().url, "https://other.example.com/rss");
        assert!(catalog.get(2).is_none());
    }

    #[test]
    fn test_reject_empty_catalog() {
        let result = FeedCatalog::new(vec![]);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least one feed"));
    }

    #[test]
    fn test_reject_blank_name_and_url() {
        let result = FeedCatalog::new(vec![Feed::new(0, "  ", "https://example.com/feed")]);
        assert!(result.unwrap_err().to_string().contains("name cannot be empty"));

        let result = FeedCatalog::new(vec![Feed::new(0, "Feed", "")]);
        assert!(result.unwrap_err().to_string().contains("URL cannot be empty"));
    }

    #[test]
    fn test_reject_duplicate_ids_and_urls() {
        let result = FeedCatalog::new(vec![
            Feed::new(0, "A", "https://a.example.com/feed"),
            Feed::new(0, "B", "https://b.example.com/feed"),
        ]);
        assert!(result.unwrap_err().to_string().contains("Duplicate feed id"));

        let result = FeedCatalog::new(vec![
            Feed::new(0, "A", "https://a.example.com/feed"),
            Feed::new(1, "B", "https://a.example.com/feed"),
        ]);
        assert!(result.unwrap_err().to_string().contains("Duplicate feed URL"));
    }

    #[test]
    fn test_reject_invalid_protocol() {
        let result = FeedCatalog::new(vec![Feed::new(0, "FTP", "ftp://example.com/feed.xml")]);
        assert!(result.unwrap_err().to_string().contains("Invalid protocol"));
    }

    #[test]
    fn test_reject_unsupported_version() {
        let result = FeedCatalog::from_yaml(
            r#"
version: 2
feeds:
  - id: 0
    name: "Example"
    url: "https://example.com/feed.xml"
"#,
        );
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unsupported config version"));
    }

    #[test]
    fn test_deny_patterns() {
        let result = FeedCatalog::from_yaml(
            r#"
version: 1
feeds:
  - id: 0
    name: "Local"
    url: "http://localhost/feed.xml"
validation:
  url_patterns:
    deny:
      - "*localhost*"
"#,
        );
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("matches deny pattern"));
    }

    #[test]
    fn test_pattern_matching() {
        assert!(matches_pattern("localhost", "localhost"));
        assert!(matches_pattern("http://localhost/feed", "*localhost*"));
        assert!(matches_pattern("http://192.168.1.1/feed", "*192.168.*"));
        assert!(!matches_pattern("http://192x168.1.1/feed", "*192.168.*"));
        assert!(!matches_pattern("example.com", "*.local"));
    }

    #[test]
    fn test_next_after_wraps() {
        let catalog = FeedCatalog::builtin();
        assert_eq!(catalog.next_after(0).unwrap().id, 1);
        assert_eq!(catalog.next_after(3).unwrap().id, 0);
        assert!(catalog.next_after(42).is_none());
    }

    #[test]
    fn test_find_by_name() {
        let catalog = FeedCatalog::builtin();
        assert_eq!(catalog.find_by_name("CSS Tricks").unwrap().id, 1);
        assert!(catalog.find_by_name("css tricks").is_none());
    }
}
