use crate::config::{FeedCatalog, Settings};
use crate::loader::fetcher::Fetcher;
use crate::loader::parser::parse_feed;
use crate::render::{MemorySurface, RenderSurface};
use crate::utils::sanitize::{strip_html, truncate};
use crate::{Error, FeedReader, Result};
use std::sync::Arc;
use tracing::warn;

/// Print the catalogue
pub fn list_feeds(catalog: &FeedCatalog) {
    println!("{:<5} {:<30} URL", "ID", "Name");
    println!("{}", "-".repeat(80));
    for feed in catalog {
        println!("{:<5} {:<30} {}", feed.id, truncate(&feed.name, 30), feed.url);
    }
}

/// Load one feed and print header and entries
pub async fn load(settings: &Settings, feed_id: u32, json: bool) -> Result<()> {
    let surface = Arc::new(MemorySurface::new());
    let reader = FeedReader::from_settings(settings, surface.clone())?;

    let report = reader.select(feed_id).await?;

    if json {
        let output = serde_json::json!({
            "report": report,
            "entries": surface.current_entries(),
        });
        let pretty = serde_json::to_string_pretty(&output)
            .map_err(|e| Error::Internal(format!("Failed to encode output: {e}")))?;
        println!("{pretty}");
        return Ok(());
    }

    print_surface(surface.as_ref());
    println!("\n{} entries loaded from {}", report.entry_count, report.feed_name);

    Ok(())
}

/// Load a feed and print the HTML the page would show
pub async fn render(settings: &Settings, feed_id: u32) -> Result<()> {
    let surface = Arc::new(MemorySurface::new());
    let reader = FeedReader::from_settings(settings, surface.clone())?;

    reader.select(feed_id).await?;
    print!("{}", surface.to_html());

    Ok(())
}

/// Walk the catalogue feed by feed, comparing each render with the previous one
pub async fn cycle(settings: &Settings) -> Result<()> {
    let surface = Arc::new(MemorySurface::new());
    let reader = FeedReader::from_settings(settings, surface.clone())?;

    let ids: Vec<u32> = reader.catalog().iter().map(|f| f.id).collect();
    let mut previous: Option<Vec<String>> = None;
    let mut failures = 0;

    for id in &ids {
        match reader.select(*id).await {
            Ok(report) => {
                let titles = surface.titles();
                let mark = if previous.as_ref() == Some(&titles) {
                    "\x1b[33m=\x1b[0m"
                } else {
                    "\x1b[32m\u{2713}\x1b[0m"
                };
                println!(
                    "{} {} ({} entries)",
                    mark, report.feed_name, report.entry_count
                );
                previous = Some(titles);
            }
            Err(e) => {
                failures += 1;
                println!("\x1b[31m\u{2717}\x1b[0m Feed {}: {}", id, e);
            }
        }
    }

    if failures > 0 {
        warn!("{} of {} feeds failed to load", failures, ids.len());
        return Err(Error::FetchFailure(format!(
            "{failures} of {} feeds failed to load",
            ids.len()
        )));
    }

    Ok(())
}

/// Fetch and parse a URL, printing a short summary
pub async fn validate_feed(settings: &Settings, url: &str) -> Result<()> {
    let fetcher = Fetcher::new(&settings.fetcher)?;

    let result = match fetcher.fetch(url).await {
        Ok(fetched) => parse_feed(&fetched.content, url),
        Err(e) => Err(e),
    };

    match result {
        Ok(feed) => {
            println!(
                "\x1b[32m\u{2713}\x1b[0m Valid feed: \"{}\"",
                feed.title.as_deref().unwrap_or("Untitled Feed")
            );
            println!("  Entries: {}", feed.entries.len());

            if !feed.entries.is_empty() {
                println!("  Sample entries:");
                for entry in feed.entries.iter().take(3) {
                    println!("    - {}", entry.title);
                }
            }

            Ok(())
        }
        Err(e) => {
            println!("\x1b[31m\u{2717}\x1b[0m Invalid feed: {}", e);
            Err(e)
        }
    }
}

fn print_surface(surface: &dyn RenderSurface) {
    let header = surface.header().unwrap_or_default();
    println!("\n{header}");
    println!("{}", "=".repeat(header.chars().count().max(1)));

    for entry in surface.current_entries() {
        println!("\n{}", entry.title);
        let text = strip_html(&entry.body);
        if !text.is_empty() {
            println!("  {}", truncate(&text, 160));
        }
        if let Some(link) = &entry.link {
            println!("  {link}");
        }
    }
}
