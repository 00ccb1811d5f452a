//! Telegram bot sink.

use crate::notifier::{NotifyError, NotifyResult, Notifier};
use async_trait::async_trait;
use teloxide::prelude::*;
use std::time::Duration;
use teloxide::types::Recipient;
use tracing::debug;

/// Telegram sink settings.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot token from BotFather.
    pub bot_token: String,
    /// Numeric chat id, or `@channelusername`.
    pub chat_id: String,
}

/// Sends messages to one chat through a bot.
pub struct TelegramNotifier {
    bot: Bot,
    recipient: Recipient,
}

impl TelegramNotifier {
    /// `timeout` bounds every Bot API request.
    pub fn new(config: &TelegramConfig, timeout: Duration) -> NotifyResult<Self> {
        let client = teloxide::net::default_reqwest_settings()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Unavailable(format!("telegram client: {}", e)))?;

        Ok(Self {
            bot: Bot::with_client(&config.bot_token, client),
            recipient: parse_recipient(&config.chat_id)?,
        })
    }
}

/// Parse a chat id as configured in the environment.
fn parse_recipient(chat_id: &str) -> NotifyResult<Recipient> {
    let chat_id = chat_id.trim();
    if chat_id.starts_with('@') && chat_id.len() > 1 {
        return Ok(Recipient::ChannelUsername(chat_id.to_string()));
    }
    chat_id
        .parse::<i64>()
        .map(|id| Recipient::Id(ChatId(id)))
        .map_err(|_| NotifyError::InvalidChat(chat_id.to_string()))
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn post(&self, text: &str) -> NotifyResult<()> {
        self.bot
            .send_message(self.recipient.clone(), text)
            .await?;
        debug!("Telegram message sent");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}
