//! worldcup.sfg.io client
//!
//! The feed serves a JSON array of matches for the current day. Each element
//! decodes straight into a [`ContestRecord`].

use super::{DataSource, SourceError};
use crate::contest::ContestRecord;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Today's matches endpoint
pub const SFG_TODAY_URL: &str = "http://worldcup.sfg.io/matches/today";

/// Configuration for the feed client
#[derive(Debug, Clone)]
pub struct SfgConfig {
    /// Endpoint returning the JSON match array
    pub url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for SfgConfig {
    fn default() -> Self {
        Self {
            url: SFG_TODAY_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the results feed
pub struct SfgClient {
    config: SfgConfig,
    client: Client,
}

impl SfgClient {
    /// Create a client with custom configuration
    pub fn with_config(config: SfgConfig) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }
}

#[async_trait]
impl DataSource for SfgClient {
    async fn get_current(&self) -> Result<Vec<ContestRecord>, SourceError> {
        tracing::debug!(url = %self.config.url, "Fetching matches");

        let response = self.client.get(&self.config.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status { status, body });
        }

        let body = response.text().await?;
        let records = decode_matches(&body)?;

        tracing::debug!(matches = records.len(), "Decoded matches");
        Ok(records)
    }
}

/// Decode the feed's match array
fn decode_matches(body: &str) -> Result<Vec<ContestRecord>, SourceError> {
    Ok(serde_json::from_str(body)?)
}
