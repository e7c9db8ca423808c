//! Progressive queue refill.

use review_core::{arrange, expand, Word};

use super::{ReviewSession, SessionEvent};
use crate::api::{fetch_words, BatchSource};
use crate::error::{ClientError, SessionError};

/// Result of one refill cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefillOutcome {
    /// Cards appended to the queue.
    Appended(usize),
    /// Upstream has no more words.
    Exhausted,
    /// The fetch failed; it is retried on a later trigger.
    Failed,
    /// Nothing fetched: a refill was already running or the session is exhausted.
    Skipped,
    /// The session was closed before the refill landed.
    Cancelled,
}

impl ReviewSession {
    /// Run a refill cycle now, regardless of remaining depth.
    ///
    /// Also the way to retry a stalled session.
    pub async fn refill(&self) -> RefillOutcome {
        let source = match self.begin_refill(false) {
            Ok(source) => source,
            Err(outcome) => {
                self.check_completion();
                return outcome;
            }
        };
        self.run_refill(source).await
    }

    /// Load plain vocabulary once the due words are exhausted.
    ///
    /// Later refills keep drawing from the extra source. Completion has
    /// already been reported for the session and does not fire again.
    pub async fn practice_more(&self, limit: u32) -> Result<usize, SessionError> {
        {
            let core = self.core();
            if core.closed {
                return Err(SessionError::Closed);
            }
            if !core.tracker.is_exhausted() {
                return Err(SessionError::NotExhausted);
            }
        }

        let words = self
            .inner
            .api
            .fetch_extra(&self.inner.language, limit)
            .await?;

        let appended = {
            let mut core = self.core();
            if core.closed {
                return Err(SessionError::Closed);
            }
            if words.is_empty() {
                0
            } else {
                let mode = self.inner.config.interleave;
                let cards = arrange(expand(&words), mode, &mut core.rng);
                let appended = cards.len();
                core.source = BatchSource::Extra;
                core.tracker.reopen();
                core.refill_failures = 0;
                core.queue.append(cards);
                appended
            }
        };

        tracing::info!(
            session_id = %self.inner.id,
            words = words.len(),
            appended,
            "Extra practice loaded"
        );
        if appended > 0 {
            self.emit_queue_changed();
            self.refresh_preview();
        }
        Ok(appended)
    }

    /// Spawn a refill when the queue is running low.
    pub(super) fn maybe_refill(&self) {
        if let Ok(source) = self.begin_refill(true) {
            let this = self.clone();
            self.track(tokio::spawn(async move {
                this.run_refill(source).await;
            }));
        }
    }

    /// Claim the refill slot. Fails if refilling is not needed or not allowed.
    fn begin_refill(&self, only_when_low: bool) -> Result<BatchSource, RefillOutcome> {
        let mut core = self.core();
        if core.closed {
            return Err(RefillOutcome::Cancelled);
        }
        if core.tracker.is_exhausted() || core.refill_in_flight {
            return Err(RefillOutcome::Skipped);
        }
        if only_when_low && core.queue.remaining_depth() > self.inner.config.refill_threshold {
            return Err(RefillOutcome::Skipped);
        }
        core.refill_in_flight = true;
        Ok(core.source)
    }

    async fn run_refill(&self, source: BatchSource) -> RefillOutcome {
        tracing::debug!(
            session_id = %self.inner.id,
            source = source.as_str(),
            "Refilling review queue"
        );
        let result = fetch_words(
            self.inner.api.as_ref(),
            source,
            &self.inner.language,
            self.inner.config.batch_limit,
        )
        .await;

        let outcome = self.apply_refill(result);
        if outcome != RefillOutcome::Cancelled {
            self.check_completion();
            self.refresh_preview();
        }
        outcome
    }

    fn apply_refill(&self, result: Result<Vec<Word>, ClientError>) -> RefillOutcome {
        let (event, outcome) = {
            let mut core = self.core();
            if core.closed {
                tracing::debug!(session_id = %self.inner.id, "Dropping refill for closed session");
                return RefillOutcome::Cancelled;
            }
            core.refill_in_flight = false;

            match result {
                Ok(words) if words.is_empty() => {
                    core.refill_failures = 0;
                    core.tracker.mark_exhausted();
                    tracing::info!(
                        session_id = %self.inner.id,
                        language = %self.inner.language,
                        "No more words to review"
                    );
                    (SessionEvent::Exhausted, RefillOutcome::Exhausted)
                }
                Ok(words) => {
                    core.refill_failures = 0;
                    let mode = self.inner.config.interleave;
                    let cards = arrange(expand(&words), mode, &mut core.rng);
                    let appended = cards.len();
                    core.queue.append(cards);
                    tracing::debug!(
                        session_id = %self.inner.id,
                        words = words.len(),
                        appended,
                        "Queue refilled"
                    );
                    (
                        SessionEvent::QueueChanged {
                            cursor: core.queue.cursor(),
                            len: core.queue.len(),
                        },
                        RefillOutcome::Appended(appended),
                    )
                }
                Err(e) => {
                    core.refill_failures += 1;
                    tracing::warn!(
                        session_id = %self.inner.id,
                        language = %self.inner.language,
                        failures = core.refill_failures,
                        error = %e,
                        "Refill failed"
                    );
                    (
                        SessionEvent::RefillFailed {
                            consecutive_failures: core.refill_failures,
                        },
                        RefillOutcome::Failed,
                    )
                }
            }
        };

        self.emit(event);
        outcome
    }
}
