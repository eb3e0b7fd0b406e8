use crate::config::FetcherConfig;
use crate::error::{Error, Result};
use reqwest::{header, Client, Response};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// HTTP fetcher with retry logic and a response size limit
pub struct Fetcher {
    client: Client,
    max_retries: u32,
    initial_backoff: Duration,
    max_feed_size: usize,
}

#[derive(Debug)]
pub struct FetchResult {
    pub content: String,
    pub content_type: Option<String>,
}

impl Fetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            initial_backoff: config.initial_backoff(),
            max_feed_size: config.max_feed_size,
        })
    }

    /// Fetch a URL with retry logic and exponential backoff
    pub async fn fetch(&self, url: &str) -> Result<FetchResult> {
        let mut retries = 0;
        let mut backoff = self.initial_backoff;

        loop {
            match self.fetch_once(url).await {
                Ok(result) => return Ok(result),
                Err(e) if retries < self.max_retries && Self::is_retryable(&e) => {
                    retries += 1;
                    warn!(
                        "Fetch failed (attempt {}/{}): {}. Retrying in {:?}",
                        retries, self.max_retries, e, backoff
                    );
                    sleep(backoff).await;
                    backoff *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<FetchResult> {
        debug!("Fetching: {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::FetchFailure(format!("HTTP {}", response.status())));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        if let Some(ref ct) = content_type {
            let ct_lower = ct.to_lowercase();
            let valid_types = [
                "text/xml",
                "application/xml",
                "application/atom+xml",
                "application/rss+xml",
                "application/feed+json",
                "application/json",
                "text/plain",
                "text/html",
            ];

            if !valid_types
                .iter()
                .any(|&valid_type| ct_lower.starts_with(valid_type))
            {
                // Plenty of servers mislabel feeds, the parser decides
                warn!("Unexpected content type: {} for {}", ct, url);
            }
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_feed_size as u64 {
                return Err(Error::Validation(format!(
                    "Feed size {} exceeds maximum {}",
                    content_length, self.max_feed_size
                )));
            }
        }

        let content = self.read_with_limit(response).await?;

        Ok(FetchResult {
            content,
            content_type,
        })
    }

    async fn read_with_limit(&self, response: Response) -> Result<String> {
        let bytes = response.bytes().await?;

        if bytes.len() > self.max_feed_size {
            return Err(Error::Validation(format!(
                "Feed size {} exceeds maximum {}",
                bytes.len(),
                self.max_feed_size
            )));
        }

        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::FeedParse(format!("Invalid UTF-8 in response: {e}")))
    }

    fn is_retryable(error: &Error) -> bool {
        match error {
            Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        let fetcher = Fetcher::new(&FetcherConfig::default());
        assert!(fetcher.is_ok());
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/missing.xml")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = Fetcher::new(&FetcherConfig::default()).unwrap();
        let result = fetcher
            .fetch(&format!("{}/missing.xml", server.url()))
            .await;

        assert!(matches!(result, Err(Error::FetchFailure(msg)) if msg.contains("404")));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/big.xml")
            .with_status(200)
            .with_body("x".repeat(2048))
            .create_async()
            .await;

        let config = FetcherConfig {
            max_feed_size: 1024,
            ..FetcherConfig::default()
        };
        let fetcher = Fetcher::new(&config).unwrap();
        let result = fetcher.fetch(&format!("{}/big.xml", server.url())).await;

        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
