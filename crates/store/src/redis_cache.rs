//! Redis-backed cache.

use crate::backend::Cache;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::info;

/// Redis connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: i64,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            password: None,
            db: 0,
        }
    }
}

impl RedisSettings {
    /// Connection URL, with the password percent-encoded.
    pub fn connection_url(&self) -> StoreResult<String> {
        let mut url = url::Url::parse(&format!("redis://{}:{}/{}", self.host, self.port, self.db))
            .map_err(|e| StoreError::Address(e.to_string()))?;

        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            url.set_password(Some(password))
                .map_err(|_| StoreError::Address(format!("cannot set password on {}", self.host)))?;
        }

        Ok(url.into())
    }
}

/// Cache stored in a Redis server.
#[derive(Clone)]
pub struct RedisCache {
    conn: MultiplexedConnection,
}

impl RedisCache {
    /// Connect to the server described by `settings`.
    pub async fn connect(settings: &RedisSettings) -> StoreResult<Self> {
        let client = redis::Client::open(settings.connection_url()?)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!(host = %settings.host, port = settings.port, db = settings.db, "Connected to Redis");
        Ok(Self { conn })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_url() {
        let url = RedisSettings::default().connection_url().unwrap();
        assert_eq!(url, "redis://localhost:6379/0");
    }

    #[test]
    fn test_url_with_password() {
        let settings = RedisSettings {
            host: "cache.internal".to_string(),
            port: 6380,
            password: Some("p@ss word".to_string()),
            db: 2,
        };
        assert_eq!(
            settings.connection_url().unwrap(),
            "redis://:p%40ss%20word@cache.internal:6380/2"
        );
    }

    #[test]
    fn test_empty_password_is_ignored() {
        let settings = RedisSettings {
            password: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(settings.connection_url().unwrap(), "redis://localhost:6379/0");
    }
}
