//! Interval hints for the current card.

use review_core::{IntervalPreview, WordId};

use super::{ReviewSession, SessionEvent};
use crate::error::ClientError;

impl ReviewSession {
    /// Interval hints for the current card, once fetched.
    pub fn interval_preview(&self) -> Option<IntervalPreview> {
        self.core().preview
    }

    /// Fetch hints when the current card differs from the last request.
    pub(super) fn refresh_preview(&self) {
        self.request_preview(false);
    }

    /// Fetch hints for the current card even if it has not moved.
    pub(super) fn force_preview(&self) {
        self.request_preview(true);
    }

    fn request_preview(&self, force: bool) {
        let (seq, word_id) = {
            let mut core = self.core();
            if core.closed {
                return;
            }
            let key = core.current_preview_key();
            if !force && key == core.preview_key {
                return;
            }
            core.preview_key = key;
            core.preview_seq += 1;
            core.preview = None;
            match key {
                Some((_, word_id)) => (core.preview_seq, word_id),
                None => return,
            }
        };

        let this = self.clone();
        self.track(tokio::spawn(async move {
            let result = this.inner.api.preview_intervals(word_id).await;
            this.apply_preview(seq, word_id, result);
        }));
    }

    fn apply_preview(&self, seq: u64, word_id: WordId, result: Result<IntervalPreview, ClientError>) {
        let preview = match result {
            Ok(preview) => preview,
            Err(e) => {
                tracing::debug!(session_id = %self.inner.id, word_id, error = %e, "Preview unavailable");
                return;
            }
        };

        {
            let mut core = self.core();
            if core.closed || core.preview_seq != seq {
                tracing::debug!(session_id = %self.inner.id, word_id, "Discarding stale preview");
                return;
            }
            core.preview = Some(preview);
        }
        self.emit(SessionEvent::PreviewUpdated { word_id, preview });
    }
}
