use feedreader::{Feed, FeedCatalog};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_builtin_feeds_are_defined() {
    let catalog = FeedCatalog::builtin();
    assert!(!catalog.is_empty());
}

#[test]
fn test_every_feed_has_url_and_name() {
    let catalog = FeedCatalog::builtin();

    for feed in &catalog {
        assert!(!feed.url.is_empty(), "feed {} has an empty url", feed.id);
        assert!(!feed.name.is_empty(), "feed {} has an empty name", feed.id);
    }
}

#[test]
fn test_ids_are_unique_and_resolvable() {
    let catalog = FeedCatalog::builtin();

    for feed in catalog.iter() {
        assert_eq!(catalog.get(feed.id), Some(feed));
    }
}

#[test]
fn test_catalog_from_file_matches_builtin_shape() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"
version: 1
feeds:
  - id: 0
    name: "Udacity Blog"
    url: "http://blog.udacity.com/feed"
  - id: 1
    name: "CSS Tricks"
    url: "http://feeds.feedburner.com/CssTricks"
"#,
    )
    .unwrap();
    file.flush().unwrap();

    let catalog = FeedCatalog::from_file(file.path()).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.find_by_name("CSS Tricks").map(|f| f.id), Some(1));
    assert_eq!(catalog.next_after(1).map(|f| f.id), Some(0));
}

#[test]
fn test_missing_file_is_config_error() {
    let result = FeedCatalog::from_file("/nonexistent/feeds.yaml");
    assert!(matches!(result, Err(feedreader::Error::Config(_))));
}

#[test]
fn test_catalog_rejects_feed_without_name() {
    let result = FeedCatalog::new(vec![
        Feed::new(0, "Valid", "https://example.com/feed"),
        Feed::new(1, "", "https://example.org/feed"),
    ]);

    let err = result.unwrap_err().to_string();
    assert!(err.contains("Feed #1"));
    assert!(err.contains("name cannot be empty"));
}

#[test]
fn test_builtin_catalog_passes_validation() {
    let builtin = FeedCatalog::builtin();
    let validated = FeedCatalog::new(builtin.iter().cloned().collect()).unwrap();

    assert_eq!(validated.len(), builtin.len());
    for feed in &validated {
        assert!(feed.url.starts_with("http://") || feed.url.starts_with("https://"));
    }
}
