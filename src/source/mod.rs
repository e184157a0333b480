//! Match data source module
//!
//! Fetches the day's matches from the results feed

mod sfg;

pub use sfg::{SfgClient, SfgConfig, SFG_TODAY_URL};

use crate::contest::ContestRecord;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while fetching or decoding the feed
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed answered with a non-success status
    #[error("Feed returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Payload did not match the expected shape
    #[error("Failed to decode feed payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Trait for match feed implementations
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the current state of every match the feed knows about
    async fn get_current(&self) -> Result<Vec<ContestRecord>, SourceError>;
}
