//! Scripted in-memory SRS service for session tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use review_core::{ComfortLevel, IntervalPreview, Word, WordId};

use crate::api::SrsApi;
use crate::error::{ClientError, Result};

pub(crate) fn words(ids: std::ops::RangeInclusive<WordId>) -> Vec<Word> {
    ids.map(|id| Word::new(id, format!("prompt {}", id), format!("answer {}", id)))
        .collect()
}

pub(crate) fn preview_for(word_id: WordId) -> IntervalPreview {
    IntervalPreview {
        easy: word_id as f64,
        good: 2.0,
        hard: 1.0,
        again: 0.0,
    }
}

pub(crate) struct FakeApi {
    batches: Mutex<VecDeque<Result<Vec<Word>>>>,
    extra: Mutex<VecDeque<Result<Vec<Word>>>>,
    known: Mutex<HashMap<WordId, Word>>,
    pub calls: Mutex<Vec<&'static str>>,
    pub grades: Mutex<Vec<(WordId, ComfortLevel)>>,
    pub previews: Mutex<Vec<WordId>>,
    pub completions: Mutex<Vec<(String, Vec<WordId>)>>,
    fail_grades: AtomicBool,
    paused: AtomicBool,
    gate: Semaphore,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            batches: Mutex::new(VecDeque::new()),
            extra: Mutex::new(VecDeque::new()),
            known: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            grades: Mutex::new(Vec::new()),
            previews: Mutex::new(Vec::new()),
            completions: Mutex::new(Vec::new()),
            fail_grades: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            gate: Semaphore::new(0),
        }
    }

    pub fn push_batch(&self, batch: Vec<Word>) {
        self.remember(&batch);
        self.batches.lock().unwrap().push_back(Ok(batch));
    }

    pub fn push_batch_error(&self) {
        self.batches
            .lock()
            .unwrap()
            .push_back(Err(ClientError::Network("connection reset".to_string())));
    }

    pub fn push_extra(&self, batch: Vec<Word>) {
        self.remember(&batch);
        self.extra.lock().unwrap().push_back(Ok(batch));
    }

    pub fn fail_grades(&self, fail: bool) {
        self.fail_grades.store(fail, Ordering::SeqCst);
    }

    /// Hold every subsequent call until `resume`.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
        self.gate.add_permits(1);
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
    }

    fn remember(&self, batch: &[Word]) {
        let mut known = self.known.lock().unwrap();
        for word in batch {
            known.insert(word.id, word.clone());
        }
    }

    async fn enter(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
        if self.paused.load(Ordering::SeqCst) {
            // The permit goes back on drop so every waiter gets through.
            let _permit = self.gate.acquire().await;
        }
    }
}

#[async_trait]
impl SrsApi for FakeApi {
    async fn fetch_batch(&self, _language: &str, _limit: u32) -> Result<Vec<Word>> {
        self.enter("fetch_batch").await;
        self.batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn fetch_extra(&self, _language: &str, _limit: u32) -> Result<Vec<Word>> {
        self.enter("fetch_extra").await;
        self.extra
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn grade(&self, word_id: WordId, level: ComfortLevel) -> Result<Word> {
        self.enter("grade").await;
        self.grades.lock().unwrap().push((word_id, level));
        if self.fail_grades.load(Ordering::SeqCst) {
            return Err(ClientError::Backend {
                status: 500,
                message: "grading unavailable".to_string(),
            });
        }
        let mut known = self.known.lock().unwrap();
        let word = known
            .get_mut(&word_id)
            .ok_or_else(|| ClientError::Backend {
                status: 404,
                message: "unknown word".to_string(),
            })?;
        word.review_count += 1;
        if level != ComfortLevel::Again {
            word.mastery_level += 1;
        }
        Ok(word.clone())
    }

    async fn preview_intervals(&self, word_id: WordId) -> Result<IntervalPreview> {
        self.enter("preview").await;
        self.previews.lock().unwrap().push(word_id);
        Ok(preview_for(word_id))
    }

    async fn complete_session(&self, language: &str, word_ids: &[WordId]) -> Result<()> {
        self.enter("complete").await;
        self.completions
            .lock()
            .unwrap()
            .push((language.to_string(), word_ids.to_vec()));
        Ok(())
    }
}
