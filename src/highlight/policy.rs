//! Highlight policy: which rules fire and how event tags map to highlights

use super::Highlight;
use crate::contest::{ContestRecord, Event};
use serde::Deserialize;

/// Classified event tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Goal,
    OwnGoal,
    YellowCard,
    RedCard,
    SubstitutionIn,
    SubstitutionOut,
    Unrecognized,
}

/// Tunable rules of the diff engine
///
/// Defaults are the canonical rule set: goals are reported through goal events
/// only, and a second yellow card is reported as a red card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DiffPolicy {
    /// Emit a score line whenever either goal count moves
    #[serde(default)]
    pub report_score_changes: bool,

    /// Map `yellow-card-second` to a red card instead of an unrecognized event
    #[serde(default = "default_true")]
    pub second_yellow_is_red: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DiffPolicy {
    fn default() -> Self {
        Self {
            report_score_changes: false,
            second_yellow_is_red: true,
        }
    }
}

impl DiffPolicy {
    /// Classify a raw event tag
    pub fn classify(&self, tag: &str) -> EventKind {
        match tag {
            "goal" | "goal-penalty" => EventKind::Goal,
            "goal-own" => EventKind::OwnGoal,
            "yellow-card" => EventKind::YellowCard,
            "red-card" => EventKind::RedCard,
            "yellow-card-second" if self.second_yellow_is_red => EventKind::RedCard,
            "substitution-in" => EventKind::SubstitutionIn,
            "substitution-out" => EventKind::SubstitutionOut,
            _ => EventKind::Unrecognized,
        }
    }

    /// Build the highlight for a newly seen event of `contest`
    pub fn highlight_for(&self, event: &Event, contest: &ContestRecord) -> Highlight {
        let contest = contest.clone();
        let event = event.clone();
        match self.classify(&event.kind) {
            EventKind::Goal => Highlight::GoalScored { contest, event },
            EventKind::OwnGoal => Highlight::OwnGoalScored { contest, event },
            EventKind::YellowCard => Highlight::YellowCardIssued { contest, event },
            EventKind::RedCard => Highlight::RedCardIssued { contest, event },
            EventKind::SubstitutionIn => Highlight::PlayerSubstitutedIn { contest, event },
            EventKind::SubstitutionOut => Highlight::PlayerSubstitutedOut { contest, event },
            EventKind::Unrecognized => Highlight::UnrecognizedEvent(event),
        }
    }
}
