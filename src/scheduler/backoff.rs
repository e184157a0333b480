//! Poll interval backoff
//!
//! After each consecutive failure the interval grows by `ratio` times itself:
//! `next = current + current * ratio`. The first success resets it to the
//! base interval. The interval saturates at the cap, or at `Duration::MAX`
//! when no cap is set.

use std::time::Duration;

/// Default growth ratio applied after a failed fetch
pub const DEFAULT_BACKOFF_RATIO: f64 = 1.0;

/// Poll interval state across consecutive failures
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    ratio: f64,
    max: Option<Duration>,
    current: Duration,
    failures: u32,
}

impl Backoff {
    /// Create a backoff starting at `base`
    pub fn new(base: Duration, ratio: f64) -> Self {
        Self {
            base,
            ratio: ratio.max(0.0),
            max: None,
            current: base,
            failures: 0,
        }
    }

    /// Cap the interval
    pub fn with_max(mut self, max: Duration) -> Self {
        self.max = Some(max);
        self
    }

    /// Interval to wait before the next poll
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Consecutive failures since the last success
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    /// Record a failed fetch and return the lengthened interval
    pub fn on_failure(&mut self) -> Duration {
        self.failures = self.failures.saturating_add(1);
        let cap = self.max.unwrap_or(Duration::MAX);
        let next = self.current.as_secs_f64() * (1.0 + self.ratio);
        self.current = Duration::try_from_secs_f64(next).unwrap_or(cap).min(cap);
        self.current
    }

    /// Record a successful fetch
    pub fn reset(&mut self) {
        self.failures = 0;
        self.current = self.base;
    }
}
