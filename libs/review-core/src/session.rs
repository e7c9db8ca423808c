//! Session completion accounting.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::WordId;

/// Per-session bookkeeping of graded words and exhaustion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub completed_word_ids: BTreeSet<WordId>,
    pub exhausted: bool,
}

/// Records graded words and decides when the session is complete.
///
/// Completion is reported at most once per tracker.
#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    state: SessionState,
    completion_fired: bool,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a graded word. Returns true the first time the word is seen.
    pub fn record(&mut self, word_id: WordId) -> bool {
        self.state.completed_word_ids.insert(word_id)
    }

    pub fn mark_exhausted(&mut self) {
        self.state.exhausted = true;
    }

    /// Clear exhaustion so more cards can be fetched. Completion stays fired.
    pub fn reopen(&mut self) {
        self.state.exhausted = false;
    }

    /// Returns the completed ids the one time the session becomes complete.
    pub fn check(&mut self, remaining_depth: usize) -> Option<BTreeSet<WordId>> {
        if self.completion_fired || !self.state.exhausted || remaining_depth > 0 {
            return None;
        }
        self.completion_fired = true;
        Some(self.state.completed_word_ids.clone())
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.exhausted
    }

    pub fn completion_fired(&self) -> bool {
        self.completion_fired
    }

    pub fn completed_count(&self) -> usize {
        self.state.completed_word_ids.len()
    }
}
