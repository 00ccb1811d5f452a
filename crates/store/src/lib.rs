//! Key-value cache for last-seen values.
//!
//! This crate provides:
//! - The `Cache` trait the checks read and write through
//! - Redis, SQLite and in-memory backends
//! - `CacheBackend` for picking one at startup

pub mod backend;
pub mod error;
pub mod memory;
pub mod redis_cache;
pub mod sqlite;

pub use backend::{Cache, CacheBackend};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryCache;
pub use redis_cache::{RedisCache, RedisSettings};
pub use sqlite::SqliteCache;
