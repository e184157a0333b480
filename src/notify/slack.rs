//! Slack notifier
//!
//! Posts each message to a channel through the Web API `chat.postMessage`.

use super::{NotifyError, Notifier};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Slack Web API endpoint for posting messages
pub const SLACK_POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Configuration for the Slack notifier
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// Bot token (`xoxb-...`)
    pub token: String,
    /// Channel name or identifier
    pub channel: String,
    /// Display name of the bot
    pub username: String,
    /// Avatar of the bot
    pub icon_url: Option<String>,
    /// Endpoint, overridable for testing
    pub api_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl SlackConfig {
    /// Create a config for posting to `channel`
    pub fn new(token: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            channel: channel.into(),
            username: "FIFA World Cup 2018".to_string(),
            icon_url: None,
            api_url: SLACK_POST_MESSAGE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set the bot display name
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Set the bot avatar
    pub fn icon_url(mut self, icon_url: Option<String>) -> Self {
        self.icon_url = icon_url;
        self
    }
}

#[derive(Debug, Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
    username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_url: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Posts messages to a Slack channel
pub struct SlackNotifier {
    config: SlackConfig,
    client: Client,
}

impl SlackNotifier {
    /// Create a notifier from configuration
    pub fn new(config: SlackConfig) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Post one message, surfacing any failure
    pub async fn post(&self, text: &str) -> Result<(), NotifyError> {
        let body = self.payload(text);

        let response: PostMessageResponse = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !response.ok {
            return Err(NotifyError::Api(
                response.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(())
    }

    fn payload<'a>(&'a self, text: &'a str) -> PostMessage<'a> {
        PostMessage {
            channel: &self.config.channel,
            text,
            username: &self.config.username,
            icon_url: self.config.icon_url.as_deref(),
        }
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn say(&self, text: &str) {
        if let Err(e) = self.post(text).await {
            tracing::warn!(
                error = %e,
                channel = %self.config.channel,
                "Failed to post message to Slack"
            );
        }
    }
}
