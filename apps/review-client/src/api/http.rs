//! REST/JSON transport for the SRS service.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use review_core::{ComfortLevel, IntervalPreview, Word, WordId};

use super::SrsApi;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

// === API Request/Response Types ===

#[derive(Debug, Serialize)]
struct WordsQuery<'a> {
    language: &'a str,
    limit: u32,
}

#[derive(Debug, Serialize)]
struct GradeRequest {
    word_id: WordId,
    comfort_level: ComfortLevel,
}

#[derive(Debug, Serialize)]
struct CompleteSessionRequest<'a> {
    language: &'a str,
    word_ids: &'a [WordId],
    activity_type: &'static str,
}

/// Word lists arrive either bare or wrapped in `{"words": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WordListResponse {
    Bare(Vec<Word>),
    Wrapped { words: Vec<Word> },
}

impl WordListResponse {
    fn into_words(self) -> Vec<Word> {
        match self {
            Self::Bare(words) | Self::Wrapped { words } => words,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WordResponse {
    Wrapped { word: Word },
    Bare(Word),
}

impl WordResponse {
    fn into_word(self) -> Word {
        match self {
            Self::Wrapped { word } | Self::Bare(word) => word,
        }
    }
}

/// HTTP client for the SRS service.
#[derive(Debug, Clone)]
pub struct HttpSrsClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpSrsClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.base_url.clone(), config.api_token.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the service is reachable.
    pub async fn check_connectivity(&self) -> Result<bool> {
        let url = self.url("/health");
        match self.client.get(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) => Err(ClientError::Network(e.to_string())),
        }
    }

    // === Private methods ===

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let resp = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Backend { status, message });
        }

        Ok(resp)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        self.send(request)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn fetch_words(&self, path: &str, language: &str, limit: u32) -> Result<Vec<Word>> {
        if limit == 0 {
            return Err(ClientError::InvalidRequest(
                "word limit must be positive".to_string(),
            ));
        }
        let request = self
            .client
            .get(self.url(path))
            .query(&WordsQuery { language, limit });
        let response: WordListResponse = self.send_json(request).await?;
        Ok(response.into_words())
    }
}

#[async_trait]
impl SrsApi for HttpSrsClient {
    async fn fetch_batch(&self, language: &str, limit: u32) -> Result<Vec<Word>> {
        self.fetch_words("/api/srs/words", language, limit).await
    }

    async fn fetch_extra(&self, language: &str, limit: u32) -> Result<Vec<Word>> {
        self.fetch_words("/api/words", language, limit).await
    }

    async fn grade(&self, word_id: WordId, level: ComfortLevel) -> Result<Word> {
        let request = self
            .client
            .post(self.url("/api/srs/flashcard/update"))
            .json(&GradeRequest {
                word_id,
                comfort_level: level,
            });
        let response: WordResponse = self.send_json(request).await?;
        Ok(response.into_word())
    }

    async fn preview_intervals(&self, word_id: WordId) -> Result<IntervalPreview> {
        let request = self
            .client
            .get(self.url(&format!("/api/srs/preview/{}", word_id)));
        self.send_json(request).await
    }

    async fn complete_session(&self, language: &str, word_ids: &[WordId]) -> Result<()> {
        let request = self
            .client
            .post(self.url("/api/activity/complete"))
            .json(&CompleteSessionRequest {
                language,
                word_ids,
                activity_type: "flashcards",
            });
        self.send(request).await?;
        Ok(())
    }
}
