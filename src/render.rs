//! Render targets the loader writes into.
//!
//! The loader never creates a surface; the composing application owns it and
//! hands it over. Only the surface's content is managed here.

use crate::loader::Entry;
use crate::utils::sanitize::{sanitize_html, sanitize_text};
use std::sync::{Mutex, MutexGuard};

/// A container for rendered entries plus a single header line
pub trait RenderSurface: Send + Sync {
    /// Replace every rendered entry
    fn set_entries(&self, entries: Vec<Entry>);

    /// Show `text` in the header display
    fn set_header(&self, text: &str);

    fn current_entries(&self) -> Vec<Entry>;

    fn header(&self) -> Option<String>;

    /// Swap header and entries in one step.
    ///
    /// Surfaces that can be observed concurrently should override this so
    /// readers never see the header of one feed with the entries of another.
    fn replace(&self, header: &str, entries: Vec<Entry>) {
        self.set_entries(entries);
        self.set_header(header);
    }
}

#[derive(Debug, Default, Clone)]
struct SurfaceState {
    header: Option<String>,
    entries: Vec<Entry>,
    renders: u64,
}

/// In-memory surface used by the CLI and tests
#[derive(Debug, Default)]
pub struct MemorySurface {
    state: Mutex<SurfaceState>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Titles of the entries currently rendered, in order
    pub fn titles(&self) -> Vec<String> {
        self.lock().entries.iter().map(|e| e.title.clone()).collect()
    }

    /// Number of times the entry set has been replaced
    pub fn render_count(&self) -> u64 {
        self.lock().renders
    }

    pub fn to_html(&self) -> String {
        render_html(&self.lock().entries)
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        // State is plain data, a panic mid-write cannot leave it half-updated
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RenderSurface for MemorySurface {
    fn set_entries(&self, entries: Vec<Entry>) {
        let mut state = self.lock();
        state.entries = entries;
        state.renders += 1;
    }

    fn set_header(&self, text: &str) {
        self.lock().header = Some(text.to_string());
    }

    fn current_entries(&self) -> Vec<Entry> {
        self.lock().entries.clone()
    }

    fn header(&self) -> Option<String> {
        self.lock().header.clone()
    }

    fn replace(&self, header: &str, entries: Vec<Entry>) {
        let mut state = self.lock();
        state.entries = entries;
        state.header = Some(header.to_string());
        state.renders += 1;
    }
}

/// Render entries as the `div.feed` fragment the reader page displays
pub fn render_html(entries: &[Entry]) -> String {
    let mut html = String::from("<div class=\"feed\">\n");

    for entry in entries {
        let title = sanitize_text(&entry.title);
        let body = sanitize_html(&entry.body);

        match &entry.link {
            Some(link) => html.push_str(&format!(
                "  <a class=\"entry-link\" href=\"{}\">\n    <article class=\"entry\">\n      <h2>{}</h2>\n      {}\n    </article>\n  </a>\n",
                sanitize_text(link),
                title,
                body
            )),
            None => html.push_str(&format!(
                "  <article class=\"entry\">\n    <h2>{title}</h2>\n    {body}\n  </article>\n"
            )),
        }
    }

    html.push_str("</div>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_updates_header_and_entries_together() {
        let surface = MemorySurface::new();
        assert!(surface.header().is_none());
        assert!(surface.current_entries().is_empty());

        surface.replace("News", vec![Entry::new("First", "<p>one</p>")]);

        assert_eq!(surface.header().as_deref(), Some("News"));
        assert_eq!(surface.titles(), vec!["First"]);
        assert_eq!(surface.render_count(), 1);
    }

    #[test]
    fn test_render_html_escapes_titles_and_cleans_bodies() {
        let entries = vec![Entry::new(
            "<b>Breaking</b>",
            "<p>Safe</p><script>alert('xss')</script>",
        )];

        let html = render_html(&entries);
        assert!(html.starts_with("<div class=\"feed\">"));
        assert!(html.contains("<article class=\"entry\">"));
        assert!(html.contains("&lt;b&gt;Breaking&lt;&#x2F;b&gt;"));
        assert!(html.contains("<p>Safe</p>"));
        assert!(!html.contains("script"));
    }

    #[test]
    fn test_render_html_empty_feed() {
        assert_eq!(render_html(&[]), "<div class=\"feed\">\n</div>\n");
    }
}
