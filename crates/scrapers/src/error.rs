//! Error types for scrape operations.

use thiserror::Error;

/// Errors that can occur while scraping a vendor site.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Element not found: {0}")]
    MissingElement(String),

    #[error("Login rejected for {0}")]
    LoginRejected(String),

    #[error("Unexpected payload: {0}")]
    Payload(String),

    #[error("Invalid number: {0}")]
    Number(#[from] checkbot_core::ParseError),

    #[error("Invalid form template: {0}")]
    Template(#[from] serde_json::Error),

    #[error("Invalid selector: {0}")]
    Selector(String),
}

impl ScrapeError {
    /// Returns true if the vendor page changed shape under us.
    /// These need a code change rather than another run.
    pub fn is_layout_change(&self) -> bool {
        matches!(
            self,
            ScrapeError::MissingElement(_) | ScrapeError::Payload(_)
        )
    }
}

/// Result type for scrape operations.
pub type ScrapeResult<T> = Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_change_classification() {
        assert!(ScrapeError::MissingElement("#x".into()).is_layout_change());
        assert!(ScrapeError::Payload("no tpldata".into()).is_layout_change());
        assert!(!ScrapeError::LoginRejected("user".into()).is_layout_change());
        assert!(!ScrapeError::Status {
            url: "https://example.com".into(),
            status: 503
        }
        .is_layout_change());
    }

    #[test]
    fn test_status_display() {
        let err = ScrapeError::Status {
            url: "https://example.com/login".into(),
            status: 500,
        };
        assert_eq!(err.to_string(), "https://example.com/login returned HTTP 500");
    }
}
