//! Error types for check runs.

use checkbot_alerts::NotifyError;
use checkbot_scrapers::ScrapeError;
use checkbot_store::StoreError;
use thiserror::Error;

/// Errors that abort a single check.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Scrape failed: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("Cache failed: {0}")]
    Cache(#[from] StoreError),

    #[error("Notification failed: {0}")]
    Notify(#[from] NotifyError),

    #[error("Unknown check: {0}")]
    UnknownCheck(String),
}

/// Result type for check operations.
pub type CheckResult<T> = Result<T, CheckError>;
