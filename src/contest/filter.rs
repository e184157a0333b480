//! Relevance filter
//!
//! Decides whether a contest is worth watching right now: live matches, matches
//! about to kick off, and matches that finished a moment ago.

use super::{ContestRecord, ContestStatus, Snapshot};
use chrono::{DateTime, Duration, Utc};

/// 90 minutes plus the interval. Extra time and penalties are not modeled.
pub const ASSUMED_MATCH_DURATION_MINS: i64 = 105;

/// Relevance predicate around kick-off and final whistle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelevanceFilter {
    /// Width of the pre-game and post-game windows
    pub threshold: Duration,
    /// Assumed time between kick-off and final whistle
    pub assumed_duration: Duration,
}

impl RelevanceFilter {
    /// Create a filter with the default assumed match duration
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            assumed_duration: Duration::minutes(ASSUMED_MATCH_DURATION_MINS),
        }
    }

    /// Override the assumed match duration
    pub fn with_assumed_duration(mut self, duration: Duration) -> Self {
        self.assumed_duration = duration;
        self
    }

    /// Whether the record counts as currently relevant at `now`
    pub fn is_relevant(&self, record: &ContestRecord, now: DateTime<Utc>) -> bool {
        match record.status {
            ContestStatus::InProgress => true,
            ContestStatus::Future => record.start_time - now < self.threshold,
            ContestStatus::Completed => {
                now - (record.start_time + self.assumed_duration) < self.threshold
            }
            ContestStatus::Other => false,
        }
    }

    /// Keep the relevant records, keyed by contest identifier
    pub fn snapshot(
        &self,
        records: impl IntoIterator<Item = ContestRecord>,
        now: DateTime<Utc>,
    ) -> Snapshot {
        records
            .into_iter()
            .filter(|r| self.is_relevant(r, now))
            .map(|r| (r.id.clone(), r))
            .collect()
    }
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self::new(Duration::seconds(20))
    }
}
