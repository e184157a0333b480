//! Snapshot diff engine
//!
//! Compares two observations of the same contest and derives what happened in
//! between. `None` on either side means the contest was not observed at that
//! poll, which is different from a record with no goals and no events.

use super::{DiffPolicy, Highlight};
use crate::contest::{ContestRecord, ContestStatus, Side};

/// Result of comparing two observations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changes {
    /// True when at least one highlight was derived
    pub changed: bool,
    /// Highlights in emission order
    pub highlights: Vec<Highlight>,
}

impl IntoIterator for Changes {
    type Item = Highlight;
    type IntoIter = std::vec::IntoIter<Highlight>;

    fn into_iter(self) -> Self::IntoIter {
        self.highlights.into_iter()
    }
}

/// Pure, total diff between two contest observations
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffEngine {
    policy: DiffPolicy,
}

impl DiffEngine {
    /// Create an engine with the canonical policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with a custom policy
    pub fn with_policy(policy: DiffPolicy) -> Self {
        Self { policy }
    }

    /// Derive highlights from `previous` to `current`
    ///
    /// Emission order is fixed:
    /// 1. start (contest appeared)
    /// 2. new events, home side then away side, in the current list's order
    /// 3. score change (only when the policy enables it)
    /// 4. half-time transitions
    /// 5. end (completed or disappeared), carrying the previous state
    pub fn what_happened_since(
        &self,
        previous: Option<&ContestRecord>,
        current: Option<&ContestRecord>,
    ) -> Changes {
        let mut highlights = Vec::new();

        if let (None, Some(current)) = (previous, current) {
            highlights.push(Highlight::ContestStarted(current.clone()));
        }

        if let Some(current) = current {
            for side in [Side::Home, Side::Away] {
                let seen = previous.map(|p| p.events(side));
                for event in current.events(side).iter() {
                    if seen.is_some_and(|s| s.contains_id(event.id)) {
                        continue;
                    }
                    highlights.push(self.policy.highlight_for(event, current));
                }
            }
        }

        if self.policy.report_score_changes {
            if let (Some(previous), Some(current)) = (previous, current) {
                if previous.home_team.goals != current.home_team.goals
                    || previous.away_team.goals != current.away_team.goals
                {
                    highlights.push(Highlight::ScoreChanged(current.clone()));
                }
            }
        }

        // An unobserved contest has no clock; a vanished one starts no second half.
        if let Some(current) = current {
            let was_half_time = previous.is_some_and(ContestRecord::is_half_time);
            match (was_half_time, current.is_half_time()) {
                (false, true) => highlights.push(Highlight::FirstHalfEnded(current.clone())),
                (true, false) => highlights.push(Highlight::SecondHalfStarted(current.clone())),
                _ => {}
            }
        }

        if let Some(previous) = previous {
            let finished = current.map_or(true, |c| c.status == ContestStatus::Completed);
            if previous.status != ContestStatus::Completed && finished {
                highlights.push(Highlight::ContestEnded(previous.clone()));
            }
        }

        Changes {
            changed: !highlights.is_empty(),
            highlights,
        }
    }
}
