//! Remote SRS service interface.

mod http;

pub use http::HttpSrsClient;

use async_trait::async_trait;
use review_core::{ComfortLevel, IntervalPreview, Word, WordId};

use crate::error::Result;

/// Operations the review engine consumes from the SRS service.
#[async_trait]
pub trait SrsApi: Send + Sync {
    /// Due and new words for review. May return fewer than `limit`, including none.
    async fn fetch_batch(&self, language: &str, limit: u32) -> Result<Vec<Word>>;

    /// Plain vocabulary, ignoring due dates.
    async fn fetch_extra(&self, language: &str, limit: u32) -> Result<Vec<Word>>;

    /// Submit a grade and receive the service's updated word.
    async fn grade(&self, word_id: WordId, level: ComfortLevel) -> Result<Word>;

    async fn preview_intervals(&self, word_id: WordId) -> Result<IntervalPreview>;

    async fn complete_session(&self, language: &str, word_ids: &[WordId]) -> Result<()>;
}

/// Where refills draw their words from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSource {
    Due,
    Extra,
}

impl BatchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Due => "due",
            Self::Extra => "extra",
        }
    }
}

/// Fetch a batch of words from the selected source.
pub async fn fetch_words(
    api: &dyn SrsApi,
    source: BatchSource,
    language: &str,
    limit: u32,
) -> Result<Vec<Word>> {
    match source {
        BatchSource::Due => api.fetch_batch(language, limit).await,
        BatchSource::Extra => api.fetch_extra(language, limit).await,
    }
}
