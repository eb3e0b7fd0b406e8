use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown feed id: {0}")]
    UnknownFeedId(u32),

    #[error("Feed fetch failed: {0}")]
    FetchFailure(String),

    #[error("Feed load timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get a sanitized error message safe for logging
    pub fn log_safe(&self) -> String {
        match self {
            // HTTP errors might contain internal URLs or authentication info
            Error::Http(_) => "External HTTP request failed".to_string(),

            Error::Internal(msg) => {
                let lower = msg.to_lowercase();
                if lower.contains("password")
                    || lower.contains("secret")
                    || lower.contains("token")
                    || lower.contains("key")
                {
                    "Internal error (details redacted)".to_string()
                } else {
                    format!("Internal error: {msg}")
                }
            }

            Error::UnknownFeedId(id) => format!("Unknown feed id: {id}"),
            Error::FetchFailure(msg) => format!("Feed fetch failed: {msg}"),
            Error::Timeout(after) => format!("Feed load timed out after {after:?}"),
            Error::FeedParse(msg) => format!("Feed parsing error: {msg}"),
            Error::InvalidUrl(_) => "Invalid URL provided".to_string(),
            Error::Io(_) => "File system operation failed".to_string(),
            Error::Config(msg) => format!("Configuration error: {msg}"),
            Error::Validation(msg) => format!("Validation error: {msg}"),
        }
    }

    /// Errors a load can report without leaving the page in a broken state.
    ///
    /// Configuration problems are the only ones that should stop the
    /// application from starting.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Config(_) | Error::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_safe_redacts_secrets() {
        let err = Error::Internal("bad api key abc123".to_string());
        assert_eq!(err.log_safe(), "Internal error (details redacted)");

        let err = Error::Internal("render lock poisoned".to_string());
        assert_eq!(err.log_safe(), "Internal error: render lock poisoned");
    }

    #[test]
    fn test_loader_errors_are_recoverable() {
        assert!(Error::UnknownFeedId(7).is_recoverable());
        assert!(Error::FetchFailure("HTTP 500".to_string()).is_recoverable());
        assert!(Error::Timeout(Duration::from_secs(1)).is_recoverable());
        assert!(!Error::Config("missing".to_string()).is_recoverable());
    }
}
