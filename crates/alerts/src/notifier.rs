//! Notifier trait and the non-network sinks.

use async_trait::async_trait;
use std::sync::Mutex;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Slack API error: {0}")]
    Slack(String),
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),
    #[error("Invalid chat: {0}")]
    InvalidChat(String),
    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

/// Result type for notifier operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// A chat channel that accepts plain-text messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post a message to the channel.
    async fn post(&self, text: &str) -> NotifyResult<()>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Writes messages to the log instead of a chat. Used for dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn post(&self, text: &str) -> NotifyResult<()> {
        info!(message = %text, "Notification (dry run)");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Keeps every posted message in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
    should_fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every post fails.
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            should_fail: true,
        }
    }

    /// Messages posted so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn post(&self, text: &str) -> NotifyResult<()> {
        if self.should_fail {
            return Err(NotifyError::Unavailable("recording notifier set to fail".to_string()));
        }
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(text.to_string());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.post("first").await.unwrap();
        notifier.post("second").await.unwrap();
        assert_eq!(notifier.messages(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_failing_notifier() {
        let notifier = RecordingNotifier::failing();
        assert!(notifier.post("lost").await.is_err());
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_log_notifier_accepts_everything() {
        assert!(LogNotifier.post("1520 Hmart points as of 2024-05-01").await.is_ok());
        assert_eq!(LogNotifier.name(), "log");
    }
}
