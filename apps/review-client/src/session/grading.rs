//! Optimistic grading with remote reconciliation.

use review_core::{Card, ComfortLevel, Word, WordId};

use super::{ReviewSession, SessionEvent};
use crate::error::{ClientError, SessionError};

/// What happened locally when a card was graded.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeReceipt {
    pub card: Card,
    pub level: ComfortLevel,
    /// Queue index of the requeued copy, for "again" grades.
    pub requeued_at: Option<usize>,
    /// True the first time this word was graded in the session.
    pub first_for_word: bool,
}

impl ReviewSession {
    /// Grade the current card and move to the next one.
    ///
    /// The word is counted as completed and, for `Again`, a copy is requeued
    /// a few cards ahead before the cursor moves. The grade is then sent
    /// upstream in the background; local bookkeeping is never rolled back.
    pub fn grade_current(&self, level: ComfortLevel) -> Result<GradeReceipt, SessionError> {
        let receipt = {
            let mut core = self.core();
            if core.closed {
                return Err(SessionError::Closed);
            }
            let card = core
                .queue
                .current_card()
                .cloned()
                .ok_or(SessionError::NoCurrentCard)?;

            let first_for_word = core.tracker.record(card.original_word_id());
            let requeued_at = if level.requeues() {
                let min = self.inner.config.requeue_min_offset;
                let max = self.inner.config.requeue_max_offset;
                let core = &mut *core;
                let index = core
                    .queue
                    .insert_ahead(card.requeued(), min, max, &mut core.rng);
                tracing::debug!(
                    session_id = %self.inner.id,
                    word_id = card.original_word_id(),
                    index,
                    "Requeued card"
                );
                Some(index)
            } else {
                None
            };
            core.queue.advance();

            GradeReceipt {
                card,
                level,
                requeued_at,
                first_for_word,
            }
        };

        self.spawn_grade(receipt.card.original_word_id(), level);
        self.after_advance();
        Ok(receipt)
    }

    fn spawn_grade(&self, word_id: WordId, level: ComfortLevel) {
        let this = self.clone();
        self.track(tokio::spawn(async move {
            let result = this.inner.api.grade(word_id, level).await;
            this.apply_grade(word_id, level, result);
        }));
    }

    fn apply_grade(&self, word_id: WordId, level: ComfortLevel, result: Result<Word, ClientError>) {
        let word = match result {
            Ok(word) => word,
            Err(e) => {
                tracing::warn!(
                    session_id = %self.inner.id,
                    word_id,
                    level = level.as_str(),
                    error = %e,
                    "Grade not synced; keeping local word state"
                );
                return;
            }
        };

        let (patched, is_current) = {
            let mut core = self.core();
            if core.closed {
                return;
            }
            let patched = core.queue.patch_word(&word);
            (patched, core.current_word_id() == Some(word.id))
        };

        if word.id != word_id {
            tracing::warn!(
                session_id = %self.inner.id,
                requested = word_id,
                returned = word.id,
                "Grade response is for a different word"
            );
        }
        tracing::debug!(session_id = %self.inner.id, word_id = word.id, patched, "Word reconciled");
        self.emit(SessionEvent::WordUpdated { word_id: word.id });
        if is_current {
            // Hints fetched before the grade landed are out of date.
            self.force_preview();
        }
    }
}
