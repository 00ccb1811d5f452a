//! Cache trait and backend selection.

use crate::error::StoreResult;
use crate::memory::MemoryCache;
use crate::redis_cache::RedisCache;
use crate::sqlite::SqliteCache;
use async_trait::async_trait;

/// String key-value store holding last-seen values.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Read a value. `None` if the key was never written.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Overwrite a value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

/// Cache backend chosen at startup.
pub enum CacheBackend {
    Redis(RedisCache),
    Sqlite(SqliteCache),
    Memory(MemoryCache),
}

impl CacheBackend {
    pub fn name(&self) -> &'static str {
        match self {
            CacheBackend::Redis(_) => "redis",
            CacheBackend::Sqlite(_) => "sqlite",
            CacheBackend::Memory(_) => "memory",
        }
    }
}

#[async_trait]
impl Cache for CacheBackend {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match self {
            CacheBackend::Redis(cache) => cache.get(key).await,
            CacheBackend::Sqlite(cache) => cache.get(key).await,
            CacheBackend::Memory(cache) => cache.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        match self {
            CacheBackend::Redis(cache) => cache.set(key, value).await,
            CacheBackend::Sqlite(cache) => cache.set(key, value).await,
            CacheBackend::Memory(cache) => cache.set(key, value).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_backend_delegates_to_memory() {
        let backend = CacheBackend::Memory(MemoryCache::new());
        assert_eq!(backend.name(), "memory");
        assert_eq!(backend.get("points").await.unwrap(), None);

        backend.set("points", "1520").await.unwrap();
        assert_eq!(backend.get("points").await.unwrap().as_deref(), Some("1520"));
    }
}
