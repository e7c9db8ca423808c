//! Change notifications and read-only views of a review session.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use review_core::{Card, IntervalPreview, WordId};

/// Notification sent to subscribers whenever session state changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    QueueChanged { cursor: usize, len: usize },
    WordUpdated { word_id: WordId },
    PreviewUpdated { word_id: WordId, preview: IntervalPreview },
    RefillFailed { consecutive_failures: u32 },
    Exhausted,
    SessionComplete(SessionSummary),
}

/// Payload of the one-time completion event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub language: String,
    pub completed_word_ids: Vec<WordId>,
    pub completed_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn word_count(&self) -> usize {
        self.completed_word_ids.len()
    }
}

/// Coarse session status for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Reviewing,
    /// Queue drained, waiting on a refill.
    Refilling,
    /// Queue drained and the last refill failed.
    Stalled,
    /// No more words upstream; finishing the remaining cards.
    Exhausted,
    Complete,
    Closed,
}

/// Point-in-time view of the queue and session bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub cursor: usize,
    pub len: usize,
    pub remaining_depth: usize,
    pub can_advance: bool,
    pub can_retreat: bool,
    pub exhausted: bool,
    pub refill_in_flight: bool,
    pub refill_failures: u32,
    pub completed_count: usize,
}

/// The current card together with its queue position.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub position: usize,
    pub card: Card,
}
