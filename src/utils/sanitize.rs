// Sanitization utilities

/// Sanitize HTML content using ammonia for XSS protection
pub fn sanitize_html(text: &str) -> String {
    ammonia::clean(text)
}

/// Escape plain text so it can be embedded in markup
pub fn sanitize_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
        .replace('/', "&#x2F;")
        .trim()
        .to_string()
}

/// Strip all markup, leaving text suitable for a terminal
pub fn strip_html(text: &str) -> String {
    let cleaned = ammonia::Builder::empty().clean(text).to_string();
    cleaned
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate text to a maximum number of characters
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_html() {
        assert!(!sanitize_html("<script>alert('xss')</script>").contains("script"));

        let sanitized = sanitize_html("<p>Hello <strong>world</strong></p>");
        assert!(sanitized.contains("<p>"));
        assert!(sanitized.contains("<strong>"));
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(
            sanitize_text("<script>alert('xss')</script>"),
            "&lt;script&gt;alert(&#x27;xss&#x27;)&lt;&#x2F;script&gt;"
        );
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Hello <strong>world</strong></p>\n<p>again</p>"),
            "Hello world again"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
    }
}
