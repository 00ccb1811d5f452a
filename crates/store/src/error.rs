//! Error types for cache operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Invalid cache address: {0}")]
    Address(String),
}

/// Result type for cache operations.
pub type StoreResult<T> = Result<T, StoreError>;
