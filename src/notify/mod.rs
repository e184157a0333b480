//! Notification module
//!
//! One-way delivery of rendered highlights to a chat channel or the console

mod slack;

pub use slack::{SlackConfig, SlackNotifier, SLACK_POST_MESSAGE_URL};

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while delivering a message
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Chat API rejected the message
    #[error("Chat API error: {0}")]
    Api(String),
}

/// Trait for notification sinks
///
/// Delivery failures are the sink's concern: implementations log them and
/// return normally.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message
    async fn say(&self, text: &str);
}

/// Prints messages to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn say(&self, text: &str) {
        println!("{}\n", text);
    }
}
