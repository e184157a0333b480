//! Polling scheduler
//!
//! Drives the poll loop: fetch, filter, diff against the previous snapshot,
//! forward highlights, back off on failure. One poll is in flight at a time.

mod backoff;

pub use backoff::{Backoff, DEFAULT_BACKOFF_RATIO};

use crate::contest::{RelevanceFilter, Snapshot};
use crate::highlight::{DiffEngine, DiffPolicy, Highlight};
use crate::notify::Notifier;
use crate::snapshot::SnapshotStore;
use crate::source::DataSource;
use crate::telemetry::{self, CounterMetric, GaugeMetric};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Notice sent before the first poll
pub const GREETING: &str = "Someone started me. I'll keep you posted about matches highlights.";

/// Notice sent on bootstrap when nothing is being played
pub const NOTHING_IN_PROGRESS: &str = "No match in progress right now.";

/// Source of the current time, for the relevance filter
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Where the scheduler is within a poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    Idle,
    Fetching,
    /// First successful poll, no previous snapshot to diff against
    Bootstrap,
    Diffing,
    Notifying,
    /// Last fetch failed; waiting out the lengthened interval
    BackingOff,
}

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Wait between polls while the feed is healthy
    pub polling_interval: Duration,
    /// Growth ratio of the wait after each failed fetch
    pub backoff_ratio: f64,
    /// Upper bound of the wait
    pub max_interval: Option<Duration>,
    /// Send a start-up notice before the first poll
    pub greeting: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            polling_interval: Duration::from_secs(10),
            backoff_ratio: DEFAULT_BACKOFF_RATIO,
            max_interval: Some(Duration::from_secs(600)),
            greeting: true,
        }
    }
}

/// What a single poll did
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Fetch failed; the store was left untouched and the scheduler stays in
    /// `BackingOff` until the next tick
    Failed {
        failures: u32,
        next_interval: Duration,
    },
    /// First successful poll; one summary per contest (or a single notice)
    Bootstrapped { contests: usize },
    /// Highlight kinds forwarded, in order
    Diffed { kinds: Vec<&'static str> },
}

/// Poll loop over the match feed
pub struct PollingScheduler {
    config: SchedulerConfig,
    source: Arc<dyn DataSource>,
    notifier: Arc<dyn Notifier>,
    filter: RelevanceFilter,
    engine: DiffEngine,
    clock: Arc<dyn Clock>,
    store: SnapshotStore,
    backoff: Backoff,
    bootstrapped: bool,
    phase: SchedulerPhase,
}

impl PollingScheduler {
    /// Create a scheduler with the canonical diff policy and the wall clock
    pub fn new(
        config: SchedulerConfig,
        source: Arc<dyn DataSource>,
        notifier: Arc<dyn Notifier>,
        filter: RelevanceFilter,
    ) -> Self {
        let mut backoff = Backoff::new(config.polling_interval, config.backoff_ratio);
        if let Some(max) = config.max_interval {
            backoff = backoff.with_max(max);
        }

        Self {
            config,
            source,
            notifier,
            filter,
            engine: DiffEngine::new(),
            clock: Arc::new(SystemClock),
            store: SnapshotStore::new(),
            backoff,
            bootstrapped: false,
            phase: SchedulerPhase::Idle,
        }
    }

    /// Use a custom diff policy
    pub fn with_policy(mut self, policy: DiffPolicy) -> Self {
        self.engine = DiffEngine::with_policy(policy);
        self
    }

    /// Use a custom clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    /// Wait before the next poll
    pub fn interval(&self) -> Duration {
        self.backoff.current()
    }

    /// Previous poll's snapshot
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Poll forever
    pub async fn run(&mut self) {
        tracing::info!(
            interval_ms = self.config.polling_interval.as_millis() as u64,
            backoff_ratio = self.config.backoff_ratio,
            "Scheduler starting"
        );

        if self.config.greeting {
            self.notifier.say(GREETING).await;
        }

        loop {
            let interval = self.backoff.current();
            telemetry::record_interval(interval);
            tokio::time::sleep(interval).await;
            self.poll_once().await;
        }
    }

    /// Run one poll cycle
    pub async fn poll_once(&mut self) -> PollOutcome {
        self.phase = SchedulerPhase::Fetching;
        telemetry::increment(CounterMetric::Polls);

        let records = match self.source.get_current().await {
            Ok(records) => records,
            Err(e) => {
                self.phase = SchedulerPhase::BackingOff;
                telemetry::increment(CounterMetric::PollFailures);
                let next_interval = self.backoff.on_failure();
                tracing::warn!(
                    error = %e,
                    attempt = self.backoff.failures(),
                    next_interval_ms = next_interval.as_millis() as u64,
                    "Fetch failed, backing off"
                );
                return PollOutcome::Failed {
                    failures: self.backoff.failures(),
                    next_interval,
                };
            }
        };

        if self.backoff.failures() > 0 {
            tracing::info!(failures = self.backoff.failures(), "Feed recovered");
        }
        self.backoff.reset();

        let current = self.filter.snapshot(records, self.clock.now());
        telemetry::set_gauge(GaugeMetric::ActiveContests, current.len() as f64);

        let outcome = if self.bootstrapped {
            self.diff_and_notify(&current).await
        } else {
            self.bootstrap(&current).await
        };

        self.store.replace_all(current);
        self.phase = SchedulerPhase::Idle;
        outcome
    }

    async fn bootstrap(&mut self, current: &Snapshot) -> PollOutcome {
        self.phase = SchedulerPhase::Bootstrap;
        self.bootstrapped = true;
        tracing::info!(contests = current.len(), "Bootstrap poll");

        self.phase = SchedulerPhase::Notifying;
        if current.is_empty() {
            self.notifier.say(NOTHING_IN_PROGRESS).await;
        }

        let mut records: Vec<_> = current.values().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        for record in records {
            self.notifier.say(&record.summary()).await;
        }

        PollOutcome::Bootstrapped {
            contests: current.len(),
        }
    }

    async fn diff_and_notify(&mut self, current: &Snapshot) -> PollOutcome {
        self.phase = SchedulerPhase::Diffing;

        let mut highlights: Vec<Highlight> = Vec::new();
        for id in self.store.union_ids(current) {
            let changes = self
                .engine
                .what_happened_since(self.store.get(&id), current.get(&id));
            if changes.changed {
                tracing::debug!(
                    contest_id = %id,
                    highlights = changes.highlights.len(),
                    "Contest changed"
                );
            }
            highlights.extend(changes);
        }

        self.phase = SchedulerPhase::Notifying;
        let mut kinds = Vec::with_capacity(highlights.len());
        for highlight in highlights {
            let kind = highlight.kind();
            telemetry::record_highlight(kind);
            self.notifier.say(&highlight.to_string()).await;
            kinds.push(kind);
        }

        PollOutcome::Diffed { kinds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contest::fixtures::{event, record};
    use crate::contest::{ContestRecord, ContestStatus};
    use crate::source::SourceError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted poll results; `None` is a failed fetch
    struct ScriptedSource {
        polls: Mutex<VecDeque<Option<Vec<ContestRecord>>>>,
    }

    impl ScriptedSource {
        fn new(polls: Vec<Option<Vec<ContestRecord>>>) -> Arc<Self> {
            Arc::new(Self {
                polls: Mutex::new(polls.into()),
            })
        }
    }

    #[async_trait]
    impl DataSource for ScriptedSource {
        async fn get_current(&self) -> Result<Vec<ContestRecord>, SourceError> {
            let next = self.polls.lock().unwrap().pop_front().flatten();
            next.ok_or_else(|| {
                SourceError::Decode(serde_json::from_str::<()>("oops").unwrap_err())
            })
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        said: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn said(&self) -> Vec<String> {
            self.said.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn say(&self, text: &str) {
            self.said.lock().unwrap().push(text.to_string());
        }
    }

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn scheduler(
        source: Arc<ScriptedSource>,
        notifier: Arc<RecordingNotifier>,
    ) -> PollingScheduler {
        let now = record("A").start_time + chrono::Duration::minutes(30);
        let config = SchedulerConfig {
            polling_interval: Duration::from_secs(10),
            backoff_ratio: 1.0,
            max_interval: None,
            greeting: false,
        };
        PollingScheduler::new(
            config,
            source,
            notifier,
            RelevanceFilter::new(chrono::Duration::minutes(5)),
        )
        .with_clock(Arc::new(FixedClock(now)))
    }

    #[tokio::test]
    async fn test_bootstrap_summarizes_each_contest() {
        let source = ScriptedSource::new(vec![Some(vec![record("B"), record("A")])]);
        let notifier = Arc::new(RecordingNotifier::default());
        let mut s = scheduler(source, notifier.clone());

        let outcome = s.poll_once().await;
        assert_eq!(outcome, PollOutcome::Bootstrapped { contests: 2 });
        assert_eq!(notifier.said().len(), 2);
        assert!(notifier.said()[0].starts_with("Brazil is playing against Switzerland."));
        assert_eq!(s.store().len(), 2);
        assert_eq!(s.phase(), SchedulerPhase::Idle);
    }

    #[tokio::test]
    async fn test_bootstrap_with_nothing_in_progress() {
        let source = ScriptedSource::new(vec![Some(vec![])]);
        let notifier = Arc::new(RecordingNotifier::default());
        let mut s = scheduler(source, notifier.clone());

        let outcome = s.poll_once().await;
        assert_eq!(outcome, PollOutcome::Bootstrapped { contests: 0 });
        assert_eq!(notifier.said(), vec![NOTHING_IN_PROGRESS.to_string()]);
    }

    #[tokio::test]
    async fn test_irrelevant_contests_filtered_out() {
        let mut finished = record("old");
        finished.status = ContestStatus::Completed;
        finished.start_time = finished.start_time - chrono::Duration::days(1);

        let source = ScriptedSource::new(vec![Some(vec![finished])]);
        let notifier = Arc::new(RecordingNotifier::default());
        let mut s = scheduler(source, notifier.clone());

        assert_eq!(s.poll_once().await, PollOutcome::Bootstrapped { contests: 0 });
        assert!(s.store().is_empty());
    }

    #[tokio::test]
    async fn test_failures_back_off_and_keep_store() {
        let source = ScriptedSource::new(vec![
            Some(vec![record("A")]),
            None,
            None,
            None,
            Some(vec![record("A")]),
        ]);
        let notifier = Arc::new(RecordingNotifier::default());
        let mut s = scheduler(source, notifier.clone());

        s.poll_once().await;
        assert_eq!(s.interval(), Duration::from_secs(10));

        let expected = [20, 40, 80];
        for (k, secs) in expected.iter().enumerate() {
            let outcome = s.poll_once().await;
            assert_eq!(
                outcome,
                PollOutcome::Failed {
                    failures: k as u32 + 1,
                    next_interval: Duration::from_secs(*secs),
                }
            );
            assert_eq!(s.store().len(), 1);
        }

        let outcome = s.poll_once().await;
        assert_eq!(outcome, PollOutcome::Diffed { kinds: vec![] });
        assert_eq!(s.interval(), Duration::from_secs(10));
        assert_eq!(notifier.said().len(), 1);
    }

    #[tokio::test]
    async fn test_backing_off_phase_lasts_until_next_tick() {
        let source = ScriptedSource::new(vec![None, Some(vec![record("A")])]);
        let notifier = Arc::new(RecordingNotifier::default());
        let mut s = scheduler(source, notifier);

        s.poll_once().await;
        assert_eq!(s.phase(), SchedulerPhase::BackingOff);

        s.poll_once().await;
        assert_eq!(s.phase(), SchedulerPhase::Idle);
    }

    #[tokio::test]
    async fn test_validated_huge_ratio_does_not_panic() {
        let mut config = crate::config::Config::default();
        config.scheduler.backoff_ratio = 1e19;
        assert!(config.validate().is_ok());

        let source = ScriptedSource::new(vec![None, None]);
        let notifier = Arc::new(RecordingNotifier::default());
        let mut s = PollingScheduler::new(
            SchedulerConfig::from(&config.scheduler),
            source,
            notifier,
            RelevanceFilter::default(),
        );

        for failures in 1..=2 {
            assert_eq!(
                s.poll_once().await,
                PollOutcome::Failed {
                    failures,
                    next_interval: Duration::from_secs(600),
                }
            );
        }
    }

    #[tokio::test]
    async fn test_failure_before_bootstrap_does_not_bootstrap() {
        let source = ScriptedSource::new(vec![None, Some(vec![record("A")])]);
        let notifier = Arc::new(RecordingNotifier::default());
        let mut s = scheduler(source, notifier.clone());

        assert!(matches!(s.poll_once().await, PollOutcome::Failed { .. }));
        assert_eq!(s.poll_once().await, PollOutcome::Bootstrapped { contests: 1 });
    }

    #[tokio::test]
    async fn test_highlights_ordered_by_contest_id() {
        let mut b = record("B");
        b.home_team_events.0.push(event(1, "red-card", "B1", "10'"));
        let mut a = record("A");
        a.away_team_events.0.push(event(1, "yellow-card", "A1", "10'"));

        let source = ScriptedSource::new(vec![
            Some(vec![record("A"), record("B")]),
            Some(vec![b, a]),
        ]);
        let notifier = Arc::new(RecordingNotifier::default());
        let mut s = scheduler(source, notifier.clone());

        s.poll_once().await;
        let outcome = s.poll_once().await;
        assert_eq!(
            outcome,
            PollOutcome::Diffed {
                kinds: vec!["yellow_card_issued", "red_card_issued"]
            }
        );
    }

    #[tokio::test]
    async fn test_new_contest_after_bootstrap_starts() {
        let source = ScriptedSource::new(vec![Some(vec![]), Some(vec![record("A")])]);
        let notifier = Arc::new(RecordingNotifier::default());
        let mut s = scheduler(source, notifier.clone());

        s.poll_once().await;
        let outcome = s.poll_once().await;
        assert_eq!(
            outcome,
            PollOutcome::Diffed {
                kinds: vec!["contest_started"]
            }
        );
        assert!(notifier.said()[1].starts_with("Brazil - Switzerland has started!"));
    }

    #[tokio::test]
    async fn test_score_policy_applies() {
        let mut scored = record("A");
        scored.home_team.goals = 1;

        let source = ScriptedSource::new(vec![Some(vec![record("A")]), Some(vec![scored])]);
        let notifier = Arc::new(RecordingNotifier::default());
        let mut s = scheduler(source, notifier.clone()).with_policy(DiffPolicy {
            report_score_changes: true,
            ..Default::default()
        });

        s.poll_once().await;
        assert_eq!(
            s.poll_once().await,
            PollOutcome::Diffed {
                kinds: vec!["score_changed"]
            }
        );
        assert_eq!(notifier.said()[1], "BRA 1 - 0 SUI");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_greets_and_polls_on_interval() {
        let source = ScriptedSource::new(vec![Some(vec![record("A")])]);
        let notifier = Arc::new(RecordingNotifier::default());
        let mut s = scheduler(source, notifier.clone());
        s.config.greeting = true;

        let handle = tokio::spawn(async move { s.run().await });

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(notifier.said(), vec![GREETING.to_string()]);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(notifier.said().len(), 2);

        handle.abort();
    }
}
