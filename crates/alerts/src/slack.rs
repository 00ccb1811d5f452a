//! Slack Web API sink.

use crate::notifier::{NotifyError, NotifyResult, Notifier};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Slack sink settings.
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// Bot token (`xoxb-...`).
    pub token: String,
    /// Channel name or id, e.g. `#checkbot`.
    pub channel: String,
}

#[derive(Debug, Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
}

/// Reply envelope shared by every Web API method.
#[derive(Debug, Deserialize)]
struct SlackReply {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    warning: Option<String>,
}

impl SlackReply {
    fn into_result(self) -> NotifyResult<()> {
        if let Some(warning) = self.warning {
            warn!(warning = %warning, "Slack API warning");
        }
        if self.ok {
            Ok(())
        } else {
            Err(NotifyError::Slack(
                self.error.unwrap_or_else(|| "unknown_error".to_string()),
            ))
        }
    }
}

/// Posts messages with `chat.postMessage`.
pub struct SlackNotifier {
    config: SlackConfig,
    http_client: reqwest::Client,
    url: String,
}

impl SlackNotifier {
    pub fn new(config: SlackConfig, timeout: Duration) -> NotifyResult<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            config,
            http_client,
            url: POST_MESSAGE_URL.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn post(&self, text: &str) -> NotifyResult<()> {
        let body = PostMessage {
            channel: &self.config.channel,
            text,
        };

        let response = self
            .http_client
            .post(&self.url)
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Slack(format!("HTTP {}", response.status())));
        }

        let reply: SlackReply = response.json().await?;
        reply.into_result()?;
        debug!(channel = %self.config.channel, "Slack message posted");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "slack"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reply_ok() {
        let reply: SlackReply =
            serde_json::from_str(r#"{"ok": true, "channel": "C123", "ts": "1.2"}"#).unwrap();
        assert!(reply.into_result().is_ok());
    }

    #[test]
    fn test_reply_error() {
        let reply: SlackReply =
            serde_json::from_str(r#"{"ok": false, "error": "channel_not_found"}"#).unwrap();
        match reply.into_result() {
            Err(NotifyError::Slack(e)) => assert_eq!(e, "channel_not_found"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_reply_error_without_detail() {
        let reply: SlackReply = serde_json::from_str(r#"{"ok": false}"#).unwrap();
        assert!(matches!(
            reply.into_result(),
            Err(NotifyError::Slack(ref e)) if e == "unknown_error"
        ));
    }

    #[test]
    fn test_post_message_body() {
        let body = PostMessage {
            channel: "#checkbot",
            text: "E-ZPass balance is $23.45",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"channel": "#checkbot", "text": "E-ZPass balance is $23.45"})
        );
    }
}
