//! Core types for the review queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Identifier of a word as assigned by the SRS service.
pub type WordId = i64;

/// A vocabulary word mirrored from the SRS service.
///
/// SRS fields are only ever replaced by values the service returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    #[serde(alias = "word")]
    pub prompt_text: String,
    #[serde(alias = "translation")]
    pub answer_text: String,
    #[serde(default)]
    pub mastery_level: u32,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default, alias = "next_review", skip_serializing_if = "Option::is_none")]
    pub next_review_timestamp: Option<DateTime<Utc>>,
}

impl Word {
    /// Create a word that has never been reviewed.
    pub fn new(id: WordId, prompt_text: impl Into<String>, answer_text: impl Into<String>) -> Self {
        Self {
            id,
            prompt_text: prompt_text.into(),
            answer_text: answer_text.into(),
            mastery_level: 0,
            review_count: 0,
            next_review_timestamp: None,
        }
    }
}

/// Which side of a word is shown first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    PromptToAnswer,
    AnswerToPrompt,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PromptToAnswer => "prompt_to_answer",
            Self::AnswerToPrompt => "answer_to_prompt",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::PromptToAnswer => Self::AnswerToPrompt,
            Self::AnswerToPrompt => Self::PromptToAnswer,
        }
    }
}

/// Self-reported recall difficulty sent to the SRS service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComfortLevel {
    Easy,
    Good,
    Hard,
    Again,
}

impl ComfortLevel {
    pub const ALL: [ComfortLevel; 4] = [Self::Easy, Self::Good, Self::Hard, Self::Again];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Good => "good",
            Self::Hard => "hard",
            Self::Again => "again",
        }
    }

    /// Whether a card graded at this level is shown again in the same session.
    pub fn requeues(self) -> bool {
        self == Self::Again
    }
}

impl std::str::FromStr for ComfortLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == name)
            .ok_or(ConfigError::UnknownComfortLevel(name))
    }
}

/// A directional review card derived from a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub word: Word,
    pub direction: Direction,
    pub is_requeued: bool,
}

impl Card {
    pub fn new(word: Word, direction: Direction) -> Self {
        Self {
            word,
            direction,
            is_requeued: false,
        }
    }

    /// Fresh wrapper around the same word, flagged as a requeue.
    pub fn requeued(&self) -> Self {
        Self {
            word: self.word.clone(),
            direction: self.direction,
            is_requeued: true,
        }
    }

    /// Word id used when grading this card.
    pub fn original_word_id(&self) -> WordId {
        self.word.id
    }

    /// Text shown before the card is flipped.
    pub fn front(&self) -> &str {
        match self.direction {
            Direction::PromptToAnswer => &self.word.prompt_text,
            Direction::AnswerToPrompt => &self.word.answer_text,
        }
    }

    /// Text revealed after the card is flipped.
    pub fn back(&self) -> &str {
        match self.direction {
            Direction::PromptToAnswer => &self.word.answer_text,
            Direction::AnswerToPrompt => &self.word.prompt_text,
        }
    }
}

/// Interval in days each comfort level would schedule, for display hints.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IntervalPreview {
    pub easy: f64,
    pub good: f64,
    pub hard: f64,
    pub again: f64,
}

impl IntervalPreview {
    pub fn for_level(&self, level: ComfortLevel) -> f64 {
        match level {
            ComfortLevel::Easy => self.easy,
            ComfortLevel::Good => self.good,
            ComfortLevel::Hard => self.hard,
            ComfortLevel::Again => self.again,
        }
    }
}
