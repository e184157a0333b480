//! Contest data model
//!
//! Point-in-time records of a match as reported by the results feed, plus the
//! relevance filter that decides which of them are worth watching.

mod filter;

pub use filter::{RelevanceFilter, ASSUMED_MATCH_DURATION_MINS};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Clock marker reported by the feed during the interval
pub const HALF_TIME: &str = "half-time";

/// In-progress contests observed at one poll, keyed by identifier
pub type Snapshot = HashMap<ContestId, ContestRecord>;

/// Stable identifier of a contest across polls
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContestId(pub String);

impl ContestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ContestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a contest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContestStatus {
    #[serde(rename = "future")]
    Future,
    #[serde(rename = "in progress", alias = "in_progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
    /// Any status the feed reports that we do not track
    #[serde(other)]
    Other,
}

/// Which team an event list belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

/// One contest's observed state at poll time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestRecord {
    #[serde(rename = "fifa_id")]
    pub id: ContestId,
    pub status: ContestStatus,
    /// Scheduled kick-off
    #[serde(rename = "datetime")]
    pub start_time: DateTime<Utc>,
    /// Free-text clock or phase marker ("45'+2'", "half-time", "full-time")
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: String,
    pub home_team: Team,
    pub away_team: Team,
    #[serde(default, deserialize_with = "null_as_default")]
    pub home_team_events: Events,
    #[serde(default, deserialize_with = "null_as_default")]
    pub away_team_events: Events,
    #[serde(default, deserialize_with = "null_as_default")]
    pub home_team_statistics: TeamStatistics,
    #[serde(default, deserialize_with = "null_as_default")]
    pub away_team_statistics: TeamStatistics,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weather: Weather,
}

impl ContestRecord {
    /// Whether the clock marker says the teams are at the interval
    pub fn is_half_time(&self) -> bool {
        self.time == HALF_TIME
    }

    /// Team on the given side
    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }

    /// Event list of the given side
    pub fn events(&self, side: Side) -> &Events {
        match side {
            Side::Home => &self.home_team_events,
            Side::Away => &self.away_team_events,
        }
    }

    /// Starting eleven of the given side
    pub fn starting_eleven(&self, side: Side) -> &Players {
        match side {
            Side::Home => &self.home_team_statistics.starting_eleven,
            Side::Away => &self.away_team_statistics.starting_eleven,
        }
    }

    /// Short score line, e.g. `BRA 1 - 0 SUI`
    pub fn score_line(&self) -> String {
        format!(
            "{} {} - {} {}",
            self.home_team.code, self.home_team.goals, self.away_team.goals, self.away_team.code
        )
    }

    /// Both team names, e.g. `Brazil - Switzerland`
    pub fn fixture(&self) -> String {
        format!("{} - {}", self.home_team.country, self.away_team.country)
    }

    /// Human-readable state used when no previous observation exists
    pub fn summary(&self) -> String {
        format!(
            "{} is playing against {}.\n{}\nTime: {}",
            self.home_team.country,
            self.away_team.country,
            self.score_line(),
            self.time
        )
    }
}

/// One side of a contest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub goals: u32,
}

/// Something that happened to one side during play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique within its side's event list
    pub id: i64,
    /// Free-form tag such as `goal`, `goal-own`, `yellow-card`
    #[serde(rename = "type_of_event", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub player: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: String,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{id: {}, type: {}, player: {}, time: {}}}",
            self.id, self.kind, self.player, self.time
        )
    }
}

/// Ordered event list of one side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Events(pub Vec<Event>);

impl Events {
    /// Whether an event with the same identifier is present
    pub fn contains_id(&self, id: i64) -> bool {
        self.0.iter().any(|e| e.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Event>> for Events {
    fn from(events: Vec<Event>) -> Self {
        Self(events)
    }
}

/// Per-team roster data, used only for rendering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStatistics {
    #[serde(default, deserialize_with = "null_as_default")]
    pub starting_eleven: Players,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shirt_number: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub captain: bool,
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.shirt_number, self.name)?;
        if self.captain {
            f.write_str(" (C)")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Players(pub Vec<Player>);

impl fmt::Display for Players {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(Player::to_string).collect();
        f.write_str(&names.join(","))
    }
}

/// Weather at the venue, used only for rendering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weather {
    #[serde(default, deserialize_with = "null_as_default")]
    pub humidity: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub temp_celsius: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub temp_farenheit: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub wind_speed: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// The feed sends `null` for fields it has not filled in yet
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
