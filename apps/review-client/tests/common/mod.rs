//! Common test utilities for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - StubSrs, an in-memory SRS service served over real HTTP
//! - Failure injection for batch fetches and grades
//! - Recording of every grade and completion the client sends


use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use review_client::review_core::{ComfortLevel, Word, WordId};
use review_client::HttpSrsClient;

/// A request as seen by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
}

/// Mutable state behind the stub service.
#[derive(Default)]
pub struct StubState {
    due: Mutex<VecDeque<Vec<Word>>>,
    extra: Mutex<Vec<Word>>,
    words: Mutex<HashMap<WordId, Word>>,
    pub requests: Mutex<Vec<RecordedRequest>>,
    pub grades: Mutex<Vec<(WordId, ComfortLevel)>>,
    pub completions: Mutex<Vec<Value>>,
    failing_fetches: AtomicUsize,
    fail_grades: AtomicBool,
}

impl StubState {
    fn remember(&self, words: &[Word]) {
        let mut known = self.words.lock().unwrap();
        for word in words {
            known.insert(word.id, word.clone());
        }
    }

    fn record(&self, path: &str, query: HashMap<String, String>, headers: &HeaderMap) {
        let authorization = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().unwrap().push(RecordedRequest {
            path: path.to_string(),
            query,
            authorization,
        });
    }
}

/// In-memory SRS service bound to an ephemeral local port.
pub struct StubSrs {
    pub state: Arc<StubState>,
    pub base_url: String,
}

impl StubSrs {
    /// Boot the stub and serve it on a background task.
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());
        let app = build_stub_router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let addr = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server failed");
        });

        Self {
            state,
            base_url: format!("http://{}", addr),
        }
    }

    pub fn client(&self) -> HttpSrsClient {
        HttpSrsClient::new(self.base_url.clone(), None)
    }

    pub fn client_with_token(&self, token: &str) -> HttpSrsClient {
        HttpSrsClient::new(self.base_url.clone(), Some(token.to_string()))
    }

    /// Queue a batch for the next due-words fetch. Fetches past the end return nothing.
    pub fn push_due(&self, words: Vec<Word>) {
        self.state.remember(&words);
        self.state.due.lock().unwrap().push_back(words);
    }

    pub fn set_extra(&self, words: Vec<Word>) {
        self.state.remember(&words);
        *self.state.extra.lock().unwrap() = words;
    }

    /// Make the next `count` due-words fetches fail with 503.
    pub fn fail_next_fetches(&self, count: usize) {
        self.state.failing_fetches.store(count, Ordering::SeqCst);
    }

    pub fn fail_grades(&self, fail: bool) {
        self.state.fail_grades.store(fail, Ordering::SeqCst);
    }

    pub fn word(&self, id: WordId) -> Option<Word> {
        self.state.words.lock().unwrap().get(&id).cloned()
    }

    pub fn grades(&self) -> Vec<(WordId, ComfortLevel)> {
        self.state.grades.lock().unwrap().clone()
    }

    pub fn completions(&self) -> Vec<Value> {
        self.state.completions.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }
}

/// Build the stub router with all routes.
fn build_stub_router(state: Arc<StubState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/srs/words", get(due_words))
        .route("/api/words", get(extra_words))
        .route("/api/srs/flashcard/update", post(grade))
        .route("/api/srs/preview/{word_id}", get(preview))
        .route("/api/activity/complete", post(complete))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct GradeBody {
    word_id: WordId,
    comfort_level: ComfortLevel,
}

fn limit_of(query: &HashMap<String, String>) -> usize {
    query
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(usize::MAX)
}

async fn due_words(
    State(state): State<Arc<StubState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.record("/api/srs/words", query.clone(), &headers);

    let failing = state.failing_fetches.load(Ordering::SeqCst);
    if failing > 0 {
        state.failing_fetches.store(failing - 1, Ordering::SeqCst);
        return (StatusCode::SERVICE_UNAVAILABLE, "try again later").into_response();
    }

    let mut batch = state.due.lock().unwrap().pop_front().unwrap_or_default();
    batch.truncate(limit_of(&query));
    Json(batch).into_response()
}

async fn extra_words(
    State(state): State<Arc<StubState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.record("/api/words", query.clone(), &headers);
    let mut extra = state.extra.lock().unwrap();
    let take = limit_of(&query).min(extra.len());
    let words: Vec<Word> = extra.drain(..take).collect();
    Json(json!({ "words": words })).into_response()
}

async fn grade(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<GradeBody>,
) -> Response {
    state.record("/api/srs/flashcard/update", HashMap::new(), &headers);
    state
        .grades
        .lock()
        .unwrap()
        .push((body.word_id, body.comfort_level));

    if state.fail_grades.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "grading offline").into_response();
    }

    let mut words = state.words.lock().unwrap();
    let Some(word) = words.get_mut(&body.word_id) else {
        return (StatusCode::NOT_FOUND, "unknown word").into_response();
    };
    word.review_count += 1;
    let days = match body.comfort_level {
        ComfortLevel::Again => 0,
        ComfortLevel::Hard => 1,
        ComfortLevel::Good => 3,
        ComfortLevel::Easy => 7,
    };
    if body.comfort_level != ComfortLevel::Again {
        word.mastery_level += 1;
    }
    word.next_review_timestamp = Some(Utc::now() + Duration::days(days));
    Json(json!({ "word": word.clone() })).into_response()
}

async fn preview(
    State(state): State<Arc<StubState>>,
    Path(word_id): Path<WordId>,
    headers: HeaderMap,
) -> Response {
    state.record("/api/srs/preview", HashMap::new(), &headers);
    Json(fixtures::preview_json(word_id)).into_response()
}

async fn complete(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("/api/activity/complete", HashMap::new(), &headers);
    state.completions.lock().unwrap().push(body);
    Json(json!({ "ok": true })).into_response()
}
