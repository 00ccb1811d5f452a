//! Chat notification sinks.
//!
//! This crate provides:
//! - The `Notifier` trait checks post through
//! - Slack and Telegram integrations
//! - Log and recording sinks for dry runs and tests

pub mod notifier;
pub mod slack;
pub mod telegram;

pub use notifier::{LogNotifier, NotifyError, NotifyResult, Notifier, RecordingNotifier};
pub use slack::{SlackConfig, SlackNotifier};
pub use telegram::{TelegramConfig, TelegramNotifier};
