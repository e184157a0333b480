//! Snapshot store
//!
//! Holds the previous poll's in-progress contests. The whole mapping is swapped
//! at the end of each cycle, so contests that dropped out of the feed never
//! linger.

use crate::contest::{ContestId, ContestRecord, Snapshot};
use std::collections::BTreeSet;

/// Previous poll's snapshot
#[derive(Debug, Default)]
pub struct SnapshotStore {
    previous: Snapshot,
}

impl SnapshotStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Last observed state of a contest, `None` if it was not observed
    pub fn get(&self, id: &ContestId) -> Option<&ContestRecord> {
        self.previous.get(id)
    }

    /// Swap in the snapshot of the cycle that just finished
    pub fn replace_all(&mut self, snapshot: Snapshot) -> Snapshot {
        std::mem::replace(&mut self.previous, snapshot)
    }

    /// Identifiers in the stored snapshot or in `current`, sorted
    pub fn union_ids(&self, current: &Snapshot) -> BTreeSet<ContestId> {
        self.previous.keys().chain(current.keys()).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.previous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }
}
