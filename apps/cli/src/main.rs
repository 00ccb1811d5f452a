//! checkbot - account change notifier
//!
//! Polls the loyalty points and toll account pages once, compares them with
//! the last-seen values and posts to chat when something changed. Meant to
//! be invoked by cron or a similar scheduler.

mod config;

use checkbot_alerts::{LogNotifier, Notifier, NotifyError, SlackNotifier, TelegramNotifier};
use checkbot_engine::{Check, CheckKind, Checkbot};
use checkbot_scrapers::{EzPassClient, HmartClient, ScrapeError};
use checkbot_store::{CacheBackend, MemoryCache, RedisCache, SqliteCache, StoreError};
use clap::Parser;
use config::{AppConfig, CacheKind, ConfigError, SinkKind};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// checkbot CLI
#[derive(Parser, Debug)]
#[command(name = "checkbot")]
#[command(about = "Notify a chat channel when account balances change", long_about = None)]
struct Args {
    /// Checks to run (repeatable): points, toll, all. Defaults to CHECKBOT_CHECKS.
    #[arg(short = 'c', long = "check")]
    checks: Vec<String>,

    /// Notification sink. Defaults to CHECKBOT_SINK, then slack.
    #[arg(short, long, value_enum)]
    sink: Option<SinkKind>,

    /// Cache backend. Defaults to CHECKBOT_CACHE, then redis.
    #[arg(long, value_enum)]
    cache: Option<CacheKind>,

    /// SQLite database file for the sqlite cache.
    #[arg(long)]
    sqlite_path: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log notifications and keep the cache in memory
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

/// Failures that stop a run before any check starts.
#[derive(Error, Debug)]
enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Cache setup failed: {0}")]
    Store(#[from] StoreError),
    #[error("Notifier setup failed: {0}")]
    Notify(#[from] NotifyError),
    #[error("Scraper setup failed: {0}")]
    Scrape(#[from] ScrapeError),
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Merge command-line overrides into the environment config.
fn apply_args(mut config: AppConfig, args: &Args) -> Result<AppConfig, ConfigError> {
    if !args.checks.is_empty() {
        config.checks = CheckKind::parse_list(&args.checks.join(","))?;
    }
    if let Some(sink) = args.sink {
        config.sink = sink;
    }
    if let Some(cache) = args.cache {
        config.cache = cache;
    }
    if let Some(ref path) = args.sqlite_path {
        config.sqlite_path = path.clone();
    }
    if args.dry_run {
        config.sink = SinkKind::Log;
        config.cache = CacheKind::Memory;
    }
    Ok(config)
}

async fn build_cache(config: &AppConfig) -> Result<CacheBackend, StoreError> {
    Ok(match config.cache {
        CacheKind::Redis => CacheBackend::Redis(RedisCache::connect(&config.redis).await?),
        CacheKind::Sqlite => CacheBackend::Sqlite(SqliteCache::open(&config.sqlite_path).await?),
        CacheKind::Memory => CacheBackend::Memory(MemoryCache::new()),
    })
}

fn build_notifier(config: &AppConfig) -> Result<Arc<dyn Notifier>, AppError> {
    let notifier: Arc<dyn Notifier> = match config.sink {
        SinkKind::Slack => Arc::new(SlackNotifier::new(config.slack()?, config.request_timeout)?),
        SinkKind::Telegram => Arc::new(TelegramNotifier::new(
            &config.telegram()?,
            config.request_timeout,
        )?),
        SinkKind::Log => Arc::new(LogNotifier),
    };
    Ok(notifier)
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    if config.checks.is_empty() {
        warn!("No checks enabled");
        return Ok(());
    }

    // Build sources first so missing credentials fail before any network I/O
    let hmart = if config.checks.contains(&CheckKind::Points) {
        Some(HmartClient::new(
            config.hmart_credentials()?,
            config.request_timeout,
        )?)
    } else {
        None
    };
    let ezpass = if config.checks.contains(&CheckKind::Toll) {
        Some(EzPassClient::new(
            config.ezpass_credentials()?,
            config.request_timeout,
        )?)
    } else {
        None
    };

    let notifier = build_notifier(&config)?;
    let cache = build_cache(&config).await?;
    info!(
        cache = cache.name(),
        sink = notifier.name(),
        checks = ?config.checks,
        "Starting checks"
    );

    let checks: Vec<Check<'_>> = config
        .checks
        .iter()
        .filter_map(|kind| match kind {
            CheckKind::Points => hmart.as_ref().map(|c| Check::Points(c)),
            CheckKind::Toll => ezpass.as_ref().map(|c| Check::Toll(c)),
        })
        .collect();

    let checkbot = Checkbot::new(Arc::new(cache), notifier).with_keys(config.keys.clone());
    let summary = checkbot.run(&checks).await;

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        notifications = summary.notifications,
        "Run complete"
    );
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_logging(&args.log_level);

    let result = match AppConfig::from_env().and_then(|config| apply_args(config, &args)) {
        Ok(config) => run(config).await,
        Err(e) => Err(e.into()),
    };

    // Exit status stays 0; the invoker retries non-zero exits.
    if let Err(e) = result {
        error!(error = %e, "Something went wrong");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("checkbot").chain(argv.iter().copied()))
    }

    #[test]
    fn test_args_defaults() {
        let args = args(&[]);
        assert!(args.checks.is_empty());
        assert!(args.sink.is_none());
        assert!(!args.dry_run);
    }

    #[test]
    fn test_apply_args_overrides() {
        let args = args(&[
            "--check",
            "toll",
            "--sink",
            "log",
            "--cache",
            "sqlite",
            "--sqlite-path",
            "/tmp/cb.db",
        ]);
        let config = apply_args(AppConfig::default(), &args).unwrap();
        assert_eq!(config.checks, vec![CheckKind::Toll]);
        assert_eq!(config.sink, SinkKind::Log);
        assert_eq!(config.cache, CacheKind::Sqlite);
        assert_eq!(config.sqlite_path, "/tmp/cb.db");
    }

    #[test]
    fn test_repeated_checks() {
        let args = args(&["-c", "points", "--check", "ezpass"]);
        let config = apply_args(AppConfig::default(), &args).unwrap();
        assert_eq!(config.checks, vec![CheckKind::Points, CheckKind::Toll]);
    }

    #[test]
    fn test_dry_run_forces_log_and_memory() {
        let args = args(&["--dry-run", "--sink", "slack", "--cache", "redis"]);
        let config = apply_args(AppConfig::default(), &args).unwrap();
        assert_eq!(config.sink, SinkKind::Log);
        assert_eq!(config.cache, CacheKind::Memory);
    }

    #[test]
    fn test_unknown_check_is_rejected() {
        let args = args(&["--check", "parking"]);
        assert!(apply_args(AppConfig::default(), &args).is_err());
    }

    #[tokio::test]
    async fn test_run_without_checks_is_ok() {
        let mut config = AppConfig::default();
        config.checks.clear();
        assert!(run(config).await.is_ok());
    }

    #[test]
    fn test_log_notifier_needs_no_credentials() {
        let mut config = AppConfig::default();
        config.sink = SinkKind::Log;
        assert_eq!(build_notifier(&config).unwrap().name(), "log");

        config.sink = SinkKind::Slack;
        assert!(matches!(
            build_notifier(&config),
            Err(AppError::Config(ConfigError::Missing("SLACK_API_TOKEN")))
        ));
    }
}
