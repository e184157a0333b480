//! End-to-end scheduler tests with a scripted feed and a recording sink

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use kickoff::contest::{
    ContestId, ContestRecord, ContestStatus, Event, Events, RelevanceFilter, Team, TeamStatistics,
    Weather,
};
use kickoff::notify::Notifier;
use kickoff::scheduler::{Clock, PollOutcome, PollingScheduler, SchedulerConfig};
use kickoff::source::{DataSource, SourceError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_test::assert_ok;

struct ScriptedSource {
    polls: Mutex<VecDeque<Vec<ContestRecord>>>,
}

#[async_trait]
impl DataSource for ScriptedSource {
    async fn get_current(&self) -> Result<Vec<ContestRecord>, SourceError> {
        Ok(self.polls.lock().unwrap().pop_front().unwrap_or_default())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    said: Mutex<Vec<String>>,
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

fn kick_off() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2018, 7, 15, 15, 0, 0).unwrap()
}

fn contest_a() -> ContestRecord {
    ContestRecord {
        id: ContestId::new("300331552"),
        status: ContestStatus::InProgress,
        start_time: kick_off(),
        time: "10'".to_string(),
        home_team: Team {
            country: "France".to_string(),
            code: "FRA".to_string(),
            goals: 0,
        },
        away_team: Team {
            country: "Croatia".to_string(),
            code: "CRO".to_string(),
            goals: 0,
        },
        home_team_events: Events::default(),
        away_team_events: Events::default(),
        home_team_statistics: TeamStatistics::default(),
        away_team_statistics: TeamStatistics::default(),
        weather: Weather::default(),
    }
}

#[tokio::test]
async fn test_match_lifecycle() {
    let poll1 = contest_a();

    let mut poll2 = contest_a();
    poll2.time = "18'".to_string();
    poll2.home_team.goals = 1;
    poll2.home_team_events = Events::from(vec![Event {
        id: 7,
        kind: "goal".to_string(),
        player: "MANDZUKIC".to_string(),
        time: "18'".to_string(),
    }]);

    let mut poll3 = poll2.clone();
    poll3.status = ContestStatus::Completed;
    poll3.time = "full-time".to_string();

    let source = Arc::new(ScriptedSource {
        polls: Mutex::new(VecDeque::from(vec![
            vec![poll1],
            vec![poll2],
            vec![poll3],
            vec![],
        ])),
    });
    let notifier = Arc::new(RecordingNotifier::default());

    let config = SchedulerConfig {
        polling_interval: Duration::from_secs(10),
        greeting: false,
        ..Default::default()
    };
    let mut scheduler = PollingScheduler::new(
        config,
        source,
        notifier.clone(),
        RelevanceFilter::new(ChronoDuration::seconds(20)),
    )
    .with_clock(Arc::new(FixedClock(kick_off() + ChronoDuration::minutes(20))));

    // Poll 1: bootstrap, one summary
    assert_eq!(
        scheduler.poll_once().await,
        PollOutcome::Bootstrapped { contests: 1 }
    );

    // Poll 2: goal event only, score-change rule is off
    assert_eq!(
        scheduler.poll_once().await,
        PollOutcome::Diffed {
            kinds: vec!["goal_scored"]
        }
    );

    // Poll 3: completed, still inside the post-game window
    assert_eq!(
        scheduler.poll_once().await,
        PollOutcome::Diffed {
            kinds: vec!["contest_ended"]
        }
    );
    assert_eq!(scheduler.store().len(), 1);

    // Poll 4: gone, nothing to say
    assert_eq!(
        scheduler.poll_once().await,
        PollOutcome::Diffed { kinds: vec![] }
    );
    assert!(scheduler.store().is_empty());

    let said = notifier.said.lock().unwrap().clone();
    assert_eq!(
        said,
        vec![
            "France is playing against Croatia.\nFRA 0 - 0 CRO\nTime: 10'".to_string(),
            "⚽ GOOOOAL! (18') MANDZUKIC scored. ⚽".to_string(),
            "France - Croatia has ended!\nFRA 1 - 0 CRO".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_contest_dropping_out_ends_once() {
    let source = Arc::new(ScriptedSource {
        polls: Mutex::new(VecDeque::from(vec![vec![contest_a()], vec![], vec![]])),
    });
    let notifier = Arc::new(RecordingNotifier::default());
    let mut scheduler = PollingScheduler::new(
        SchedulerConfig::default(),
        source,
        notifier.clone(),
        RelevanceFilter::default(),
    );

    scheduler.poll_once().await;
    let dropped = scheduler.poll_once().await;
    assert_eq!(
        dropped,
        PollOutcome::Diffed {
            kinds: vec!["contest_ended"]
        }
    );
    let still_gone = scheduler.poll_once().await;
    assert_eq!(still_gone, PollOutcome::Diffed { kinds: vec![] });
    assert_eq!(notifier.said.lock().unwrap().len(), 2);
}

#[test]
fn test_feed_record_roundtrip_through_filter() {
    let json = serde_json::to_string(&vec![contest_a()]).unwrap();
    let records: Vec<ContestRecord> = assert_ok!(serde_json::from_str(&json));
    let snapshot = RelevanceFilter::default().snapshot(records, kick_off());
    assert_eq!(snapshot.len(), 1);
}
