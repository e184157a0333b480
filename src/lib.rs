//! kickoff: Live football match highlights bot
//!
//! This library provides the core components for:
//! - Match feed polling (worldcup.sfg.io JSON)
//! - Relevance filtering around kick-off and final whistle
//! - Snapshot diffing into discrete highlights
//! - Poll scheduling with backoff on feed failures
//! - Slack and console notification
//! - Logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod contest;
pub mod highlight;
pub mod notify;
pub mod scheduler;
pub mod snapshot;
pub mod source;
pub mod telemetry;
