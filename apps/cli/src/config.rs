//! Application configuration.
//!
//! Everything comes from environment variables (a `.env` file is loaded
//! first); command-line flags override a few of them.

use checkbot_alerts::{SlackConfig, TelegramConfig};
use checkbot_engine::{CacheKeys, CheckError, CheckKind};
use checkbot_scrapers::{EzPassCredentials, HmartCredentials};
use checkbot_store::RedisSettings;
use clap::ValueEnum;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
    #[error("{0}")]
    Check(#[from] CheckError),
}

/// Where notifications go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkKind {
    Slack,
    Telegram,
    /// Log messages instead of posting them.
    Log,
}

/// Where last-seen values are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheKind {
    Redis,
    Sqlite,
    /// Forget everything at exit.
    Memory,
}

/// Application configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Checks to run, in order.
    pub checks: Vec<CheckKind>,
    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,
    pub keys: CacheKeys,
    pub sink: SinkKind,
    pub cache: CacheKind,
    pub redis: RedisSettings,
    pub sqlite_path: String,
    hmart_number: Option<String>,
    hmart_name: Option<String>,
    hmart_zip: Option<String>,
    ez_username: Option<String>,
    ez_password: Option<String>,
    slack_token: Option<String>,
    pub slack_channel: String,
    telegram_bot_token: Option<String>,
    telegram_chat_id: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("checks", &self.checks)
            .field("request_timeout", &self.request_timeout)
            .field("keys", &self.keys)
            .field("sink", &self.sink)
            .field("cache", &self.cache)
            .field("redis_host", &self.redis.host)
            .field("redis_port", &self.redis.port)
            .field("sqlite_path", &self.sqlite_path)
            .field("hmart_configured", &self.hmart_number.is_some())
            .field("ez_configured", &self.ez_username.is_some())
            .field("slack_channel", &self.slack_channel)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            checks: CheckKind::ALL.to_vec(),
            request_timeout: Duration::from_secs(10),
            keys: CacheKeys::default(),
            sink: SinkKind::Slack,
            cache: CacheKind::Redis,
            redis: RedisSettings::default(),
            sqlite_path: "checkbot.db".to_string(),
            hmart_number: None,
            hmart_name: None,
            hmart_zip: None,
            ez_username: None,
            ez_password: None,
            slack_token: None,
            slack_channel: "#checkbot".to_string(),
            telegram_bot_token: None,
            telegram_chat_id: None,
        }
    }
}

impl AppConfig {
    /// Create config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create config from any variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(checks) = get("CHECKBOT_CHECKS") {
            config.checks = CheckKind::parse_list(&checks)?;
        }
        if let Some(secs) = get("CHECKBOT_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(parse_var("CHECKBOT_TIMEOUT_SECS", &secs)?);
        }
        if let Some(key) = get("CHECKBOT_POINTS_KEY") {
            config.keys.points = key;
        }
        if let Some(key) = get("CHECKBOT_BALANCE_KEY") {
            config.keys.toll_balance = key;
        }
        if let Some(sink) = get("CHECKBOT_SINK") {
            config.sink = parse_enum("CHECKBOT_SINK", &sink)?;
        }
        if let Some(cache) = get("CHECKBOT_CACHE") {
            config.cache = parse_enum("CHECKBOT_CACHE", &cache)?;
        }

        if let Some(host) = get("REDIS_HOST") {
            config.redis.host = host;
        }
        if let Some(port) = get("REDIS_PORT") {
            config.redis.port = parse_var("REDIS_PORT", &port)?;
        }
        if let Some(db) = get("REDIS_DB") {
            config.redis.db = parse_var("REDIS_DB", &db)?;
        }
        config.redis.password = get("REDIS_PASSWORD");
        if let Some(path) = get("SQLITE_PATH") {
            config.sqlite_path = path;
        }

        config.hmart_number = get("HMART_NUMBER");
        config.hmart_name = get("HMART_NAME");
        config.hmart_zip = get("HMART_ZIP");
        config.ez_username = get("EZ_USERNAME");
        config.ez_password = get("EZ_PASSWORD");

        config.slack_token = get("SLACK_API_TOKEN");
        if let Some(channel) = get("SLACK_CHANNEL") {
            config.slack_channel = channel;
        }
        config.telegram_bot_token = get("TELEGRAM_BOT_TOKEN");
        config.telegram_chat_id = get("TELEGRAM_CHAT_ID");

        Ok(config)
    }

    /// Card details for the points check.
    pub fn hmart_credentials(&self) -> Result<HmartCredentials, ConfigError> {
        Ok(HmartCredentials {
            card_number: required(&self.hmart_number, "HMART_NUMBER")?,
            last_name: required(&self.hmart_name, "HMART_NAME")?,
            zip_code: required(&self.hmart_zip, "HMART_ZIP")?,
        })
    }

    /// Login for the toll check.
    pub fn ezpass_credentials(&self) -> Result<EzPassCredentials, ConfigError> {
        Ok(EzPassCredentials {
            username: required(&self.ez_username, "EZ_USERNAME")?,
            password: required(&self.ez_password, "EZ_PASSWORD")?,
        })
    }

    pub fn slack(&self) -> Result<SlackConfig, ConfigError> {
        Ok(SlackConfig {
            token: required(&self.slack_token, "SLACK_API_TOKEN")?,
            channel: self.slack_channel.clone(),
        })
    }

    pub fn telegram(&self) -> Result<TelegramConfig, ConfigError> {
        Ok(TelegramConfig {
            bot_token: required(&self.telegram_bot_token, "TELEGRAM_BOT_TOKEN")?,
            chat_id: required(&self.telegram_chat_id, "TELEGRAM_CHAT_ID")?,
        })
    }
}

fn required(value: &Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value.clone().ok_or(ConfigError::Missing(name))
}

fn parse_var<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

fn parse_enum<T: ValueEnum>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    T::from_str(value.trim(), true).map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.checks, vec![CheckKind::Points, CheckKind::Toll]);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.keys.points, "points");
        assert_eq!(config.keys.toll_balance, "ez_balance");
        assert_eq!(config.sink, SinkKind::Slack);
        assert_eq!(config.cache, CacheKind::Redis);
        assert_eq!(config.redis, RedisSettings::default());
        assert_eq!(config.slack_channel, "#checkbot");
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CHECKBOT_CHECKS", "toll"),
            ("CHECKBOT_TIMEOUT_SECS", "30"),
            ("CHECKBOT_SINK", "Telegram"),
            ("CHECKBOT_CACHE", "sqlite"),
            ("REDIS_HOST", "cache.internal"),
            ("REDIS_PORT", "6380"),
            ("REDIS_PASSWORD", ""),
            ("SLACK_CHANNEL", "#tolls"),
        ]))
        .unwrap();

        assert_eq!(config.checks, vec![CheckKind::Toll]);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.sink, SinkKind::Telegram);
        assert_eq!(config.cache, CacheKind::Sqlite);
        assert_eq!(config.redis.host, "cache.internal");
        assert_eq!(config.redis.port, 6380);
        assert_eq!(config.redis.password, None);
        assert_eq!(config.slack_channel, "#tolls");
    }

    #[test]
    fn test_invalid_values() {
        let err = AppConfig::from_lookup(lookup(&[("REDIS_PORT", "redis")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "REDIS_PORT", .. }));

        let err = AppConfig::from_lookup(lookup(&[("CHECKBOT_CHECKS", "parking")])).unwrap_err();
        assert!(matches!(err, ConfigError::Check(_)));

        let err = AppConfig::from_lookup(lookup(&[("CHECKBOT_SINK", "email")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "CHECKBOT_SINK", .. }));
    }

    #[test]
    fn test_credentials_required() {
        let config = AppConfig::from_lookup(lookup(&[
            ("HMART_NUMBER", "1234567890"),
            ("HMART_NAME", "Kim"),
        ]))
        .unwrap();

        assert!(matches!(
            config.hmart_credentials(),
            Err(ConfigError::Missing("HMART_ZIP"))
        ));
        assert!(matches!(
            config.ezpass_credentials(),
            Err(ConfigError::Missing("EZ_USERNAME"))
        ));
        assert!(matches!(
            config.slack(),
            Err(ConfigError::Missing("SLACK_API_TOKEN"))
        ));
    }

    #[test]
    fn test_credentials_present() {
        let config = AppConfig::from_lookup(lookup(&[
            ("EZ_USERNAME", "driver"),
            ("EZ_PASSWORD", "secret"),
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_CHAT_ID", "-100200"),
        ]))
        .unwrap();

        let ez = config.ezpass_credentials().unwrap();
        assert_eq!(ez.username, "driver");
        assert_eq!(config.telegram().unwrap().chat_id, "-100200");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AppConfig::from_lookup(lookup(&[
            ("EZ_PASSWORD", "hunter2"),
            ("SLACK_API_TOKEN", "xoxb-secret"),
        ]))
        .unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("xoxb-secret"));
    }
}
