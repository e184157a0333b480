//! Highlight module
//!
//! Derives the notable changes between two observations of the same contest
//! and renders them as chat-ready text.

mod diff;
mod policy;

pub use diff::{Changes, DiffEngine};
pub use policy::{DiffPolicy, EventKind};

use crate::contest::{ContestRecord, Event, Side};
use std::fmt;

/// One discrete, renderable change in a contest
#[derive(Debug, Clone, PartialEq)]
pub enum Highlight {
    /// Contest appeared for the first time
    ContestStarted(ContestRecord),
    /// Contest completed or disappeared; carries the last known state
    ContestEnded(ContestRecord),
    /// Either side's goal count moved
    ScoreChanged(ContestRecord),
    /// Clock moved into half-time
    FirstHalfEnded(ContestRecord),
    /// Clock moved out of half-time
    SecondHalfStarted(ContestRecord),
    GoalScored {
        contest: ContestRecord,
        event: Event,
    },
    OwnGoalScored {
        contest: ContestRecord,
        event: Event,
    },
    YellowCardIssued {
        contest: ContestRecord,
        event: Event,
    },
    RedCardIssued {
        contest: ContestRecord,
        event: Event,
    },
    PlayerSubstitutedIn {
        contest: ContestRecord,
        event: Event,
    },
    PlayerSubstitutedOut {
        contest: ContestRecord,
        event: Event,
    },
    /// Event tag we have no mapping for; the raw event is kept for diagnostics
    UnrecognizedEvent(Event),
}

impl Highlight {
    /// Stable snake_case name, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            Highlight::ContestStarted(_) => "contest_started",
            Highlight::ContestEnded(_) => "contest_ended",
            Highlight::ScoreChanged(_) => "score_changed",
            Highlight::FirstHalfEnded(_) => "first_half_ended",
            Highlight::SecondHalfStarted(_) => "second_half_started",
            Highlight::GoalScored { .. } => "goal_scored",
            Highlight::OwnGoalScored { .. } => "own_goal_scored",
            Highlight::YellowCardIssued { .. } => "yellow_card_issued",
            Highlight::RedCardIssued { .. } => "red_card_issued",
            Highlight::PlayerSubstitutedIn { .. } => "player_substituted_in",
            Highlight::PlayerSubstitutedOut { .. } => "player_substituted_out",
            Highlight::UnrecognizedEvent(_) => "unrecognized_event",
        }
    }
}

impl fmt::Display for Highlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Highlight::ContestStarted(c) => {
                let w = &c.weather;
                write!(
                    f,
                    "{} has started!\n\
                     | Weather | {}, {}°C/{}°F, Wind {}, Humidity {}\n\
                     | Starting eleven {} | {}\n\
                     | Starting eleven {} | {}",
                    c.fixture(),
                    w.description,
                    w.temp_celsius,
                    w.temp_farenheit,
                    w.wind_speed,
                    w.humidity,
                    c.team(Side::Home).country,
                    c.starting_eleven(Side::Home),
                    c.team(Side::Away).country,
                    c.starting_eleven(Side::Away),
                )
            }
            Highlight::ContestEnded(c) => {
                write!(f, "{} has ended!\n{}", c.fixture(), c.score_line())
            }
            Highlight::ScoreChanged(c) => f.write_str(&c.score_line()),
            Highlight::FirstHalfEnded(c) => {
                write!(f, "First half of {} has ended!\n{}", c.fixture(), c.score_line())
            }
            Highlight::SecondHalfStarted(c) => {
                write!(f, "Second half of {} has started!", c.fixture())
            }
            Highlight::GoalScored { event, .. } => {
                write!(f, "⚽ GOOOOAL! ({}) {} scored. ⚽", event.time, event.player)
            }
            Highlight::OwnGoalScored { contest, event } => write!(
                f,
                "Lol! ({}) {} scored an own goal...\n{}",
                event.time,
                event.player,
                contest.score_line()
            ),
            Highlight::YellowCardIssued { contest, event } => write!(
                f,
                "{} Uh oh! Yellow card for {} ({})",
                codes(contest),
                event.player,
                event.time
            ),
            Highlight::RedCardIssued { contest, event } => write!(
                f,
                "{} Oh no! Red card for {} ({}). Sent off.",
                codes(contest),
                event.player,
                event.time
            ),
            Highlight::PlayerSubstitutedIn { contest, event } => write!(
                f,
                "{} It's the turn of {} ({}).",
                codes(contest),
                event.player,
                event.time
            ),
            Highlight::PlayerSubstitutedOut { contest, event } => write!(
                f,
                "{} {} was substituted ({}).",
                codes(contest),
                event.player,
                event.time
            ),
            Highlight::UnrecognizedEvent(event) => write!(
                f,
                "Something happened but I didn't get what, exactly.\n{}",
                event
            ),
        }
    }
}

/// `| BRA - SUI |` prefix for per-player highlights
fn codes(contest: &ContestRecord) -> String {
    format!("| {} - {} |", contest.home_team.code, contest.away_team.code)
}
