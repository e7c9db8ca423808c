//! Word to card expansion.

use crate::types::{Card, Direction, Word};

/// Expand each word into a prompt-first card followed by an answer-first card.
pub fn expand(words: &[Word]) -> Vec<Card> {
    words
        .iter()
        .flat_map(|word| {
            [
                Card::new(word.clone(), Direction::PromptToAnswer),
                Card::new(word.clone(), Direction::AnswerToPrompt),
            ]
        })
        .collect()
}
