//! Review session engine.
//!
//! A [`ReviewSession`] owns one queue for one language. Queue mutations are
//! synchronous and happen under a short-lived lock that is never held across
//! an `.await`; network work (refills, grade reconciliation, interval
//! previews) runs on spawned tasks whose effects are applied when they
//! complete. After [`ReviewSession::close`] every late completion is a no-op.

mod events;
mod grading;
mod preview;
mod refill;

#[cfg(test)]
mod testing;

pub use events::{CardView, SessionEvent, SessionSnapshot, SessionStatus, SessionSummary};
pub use grading::GradeReceipt;
pub use refill::RefillOutcome;

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use review_core::{
    arrange, expand, EngineConfig, IntervalPreview, ReviewQueue, SessionState, SessionTracker,
    WordId,
};

use crate::api::{BatchSource, SrsApi};
use crate::error::{ClientError, SessionError};

const EVENT_CAPACITY: usize = 64;

/// Mutable session state guarded by the session lock.
struct SessionCore {
    queue: ReviewQueue,
    tracker: SessionTracker,
    refill_in_flight: bool,
    refill_failures: u32,
    source: BatchSource,
    /// Position and word of the card the last preview was requested for.
    preview_key: Option<(usize, WordId)>,
    preview_seq: u64,
    preview: Option<IntervalPreview>,
    summary: Option<SessionSummary>,
    reported: bool,
    closed: bool,
    rng: StdRng,
}

impl SessionCore {
    fn status(&self) -> SessionStatus {
        let drained = self.queue.remaining_depth() == 0;
        if self.closed {
            SessionStatus::Closed
        } else if self.tracker.is_exhausted() {
            if drained {
                SessionStatus::Complete
            } else {
                SessionStatus::Exhausted
            }
        } else if drained && self.refill_in_flight {
            SessionStatus::Refilling
        } else if drained && self.refill_failures > 0 {
            SessionStatus::Stalled
        } else {
            SessionStatus::Reviewing
        }
    }

    fn current_word_id(&self) -> Option<WordId> {
        self.queue.current_card().map(|c| c.original_word_id())
    }

    fn current_preview_key(&self) -> Option<(usize, WordId)> {
        self.current_word_id().map(|id| (self.queue.cursor(), id))
    }
}

/// Inner state shared across clones.
struct SessionInner {
    id: Uuid,
    language: String,
    config: EngineConfig,
    api: Arc<dyn SrsApi>,
    core: Mutex<SessionCore>,
    events: broadcast::Sender<SessionEvent>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

/// A flashcard review session.
///
/// Clone-able: all state sits behind an `Arc`, so background tasks hold a
/// clone across await points. Methods that spawn work must run inside a
/// tokio runtime.
#[derive(Clone)]
pub struct ReviewSession {
    inner: Arc<SessionInner>,
}

impl ReviewSession {
    /// Fetch the first batch and build the queue.
    ///
    /// An empty first batch produces a session that is already complete; its
    /// summary is available from [`ReviewSession::completion`].
    pub async fn start(
        api: Arc<dyn SrsApi>,
        language: impl Into<String>,
        config: EngineConfig,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        let language = language.into();
        let id = Uuid::new_v4();

        let words = api.fetch_batch(&language, config.batch_limit).await?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let cards = arrange(expand(&words), config.interleave, &mut rng);
        let mut tracker = SessionTracker::new();
        if words.is_empty() {
            tracker.mark_exhausted();
        }

        tracing::info!(
            session_id = %id,
            language = %language,
            words = words.len(),
            cards = cards.len(),
            "Review session started"
        );

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let session = Self {
            inner: Arc::new(SessionInner {
                id,
                language,
                config,
                api,
                core: Mutex::new(SessionCore {
                    queue: ReviewQueue::with_cards(cards),
                    tracker,
                    refill_in_flight: false,
                    refill_failures: 0,
                    source: BatchSource::Due,
                    preview_key: None,
                    preview_seq: 0,
                    preview: None,
                    summary: None,
                    reported: false,
                    closed: false,
                    rng,
                }),
                events,
                tasks: Mutex::new(Vec::new()),
            }),
        };

        session.check_completion();
        session.refresh_preview();
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn language(&self) -> &str {
        &self.inner.language
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// The card at the cursor, if any.
    pub fn current(&self) -> Option<CardView> {
        let core = self.core();
        core.queue.current_card().map(|card| CardView {
            position: core.queue.cursor(),
            card: card.clone(),
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let core = self.core();
        SessionSnapshot {
            status: core.status(),
            cursor: core.queue.cursor(),
            len: core.queue.len(),
            remaining_depth: core.queue.remaining_depth(),
            can_advance: core.queue.can_advance(),
            can_retreat: core.queue.can_retreat(),
            exhausted: core.tracker.is_exhausted(),
            refill_in_flight: core.refill_in_flight,
            refill_failures: core.refill_failures,
            completed_count: core.tracker.completed_count(),
        }
    }

    pub fn session_state(&self) -> SessionState {
        self.core().tracker.state().clone()
    }

    /// Copy of the queue, for inspection.
    pub fn queue(&self) -> ReviewQueue {
        self.core().queue.clone()
    }

    /// Completion summary, once the session has completed.
    pub fn completion(&self) -> Option<SessionSummary> {
        self.core().summary.clone()
    }

    /// Move past the current card without grading it.
    pub fn skip(&self) -> bool {
        let moved = {
            let mut core = self.core();
            !core.closed && core.queue.advance()
        };
        if moved {
            self.after_advance();
        }
        moved
    }

    /// Step forward into cards that were already reached earlier.
    pub fn go_forward(&self) -> bool {
        let moved = {
            let mut core = self.core();
            !core.closed && core.queue.can_advance() && core.queue.advance()
        };
        if moved {
            self.after_advance();
        }
        moved
    }

    /// Step back to the previous card.
    pub fn go_back(&self) -> bool {
        let moved = {
            let mut core = self.core();
            !core.closed && core.queue.retreat()
        };
        if moved {
            self.emit_queue_changed();
            self.refresh_preview();
        }
        moved
    }

    /// Post the completion summary to the activity endpoint.
    pub async fn report_completion(&self) -> Result<SessionSummary, SessionError> {
        let summary = {
            let mut core = self.core();
            let summary = core.summary.clone().ok_or(SessionError::NotComplete)?;
            if core.reported {
                return Err(SessionError::AlreadyReported);
            }
            core.reported = true;
            summary
        };

        let result = self
            .inner
            .api
            .complete_session(&summary.language, &summary.completed_word_ids)
            .await;

        match result {
            Ok(()) => {
                tracing::info!(
                    session_id = %self.inner.id,
                    words = summary.word_count(),
                    "Session completion reported"
                );
                Ok(summary)
            }
            Err(e) => {
                self.core().reported = false;
                tracing::warn!(session_id = %self.inner.id, error = %e, "Failed to report completion");
                Err(e.into())
            }
        }
    }

    /// Tear the session down. In-flight work finishes but changes nothing.
    pub fn close(&self) {
        let mut core = self.core();
        if !core.closed {
            core.closed = true;
            tracing::info!(session_id = %self.inner.id, "Review session closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.core().closed
    }

    /// Wait for every background task spawned so far, including tasks those spawn.
    pub async fn settle(&self) {
        loop {
            let handles: Vec<JoinHandle<()>> = {
                let mut tasks = self
                    .inner
                    .tasks
                    .lock()
                    .unwrap_or_else(|e| e.into_inner());
                std::mem::take(&mut *tasks)
            };
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::warn!(session_id = %self.inner.id, error = %e, "Background task failed");
                }
            }
        }
    }

    // === Private methods ===

    fn core(&self) -> MutexGuard<'_, SessionCore> {
        self.inner.core.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }

    fn emit_queue_changed(&self) {
        let (cursor, len) = {
            let core = self.core();
            (core.queue.cursor(), core.queue.len())
        };
        self.emit(SessionEvent::QueueChanged { cursor, len });
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut tasks = self.inner.tasks.lock().unwrap_or_else(|e| e.into_inner());
        tasks.retain(|h| !h.is_finished());
        tasks.push(handle);
    }

    /// Runs after every cursor advance.
    fn after_advance(&self) {
        self.emit_queue_changed();
        self.maybe_refill();
        self.check_completion();
        self.refresh_preview();
    }

    fn check_completion(&self) {
        let summary = {
            let mut core = self.core();
            if core.closed {
                return;
            }
            let depth = core.queue.remaining_depth();
            match core.tracker.check(depth) {
                Some(ids) => {
                    let summary = SessionSummary {
                        session_id: self.inner.id,
                        language: self.inner.language.clone(),
                        completed_word_ids: ids.into_iter().collect(),
                        completed_at: Utc::now(),
                    };
                    core.summary = Some(summary.clone());
                    summary
                }
                None => return,
            }
        };

        tracing::info!(
            session_id = %self.inner.id,
            language = %self.inner.language,
            words = summary.word_count(),
            "Review session complete"
        );
        self.emit(SessionEvent::SessionComplete(summary));
    }
}
