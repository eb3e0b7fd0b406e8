// Utility functions
pub mod sanitize;

/// Resolve a possibly relative link against the feed URL it came from.
/// Absolute links are returned as-is.
pub fn resolve_link(link: &str, base_url: &str) -> Option<String> {
    if url::Url::parse(link).is_ok() {
        return Some(link.to_string());
    }

    url::Url::parse(base_url)
        .ok()
        .and_then(|base| base.join(link).ok())
        .map(|resolved| resolved.to_string())
}
