//! Session-local review queue with a navigable cursor.

use rand::Rng;

use crate::types::{Card, Word};

/// Ordered cards plus a cursor.
///
/// Cards before the cursor are history and stay in place so the learner can
/// step back through them. `seen_high_water_mark` is the furthest the cursor
/// has been, which bounds forward navigation through history.
///
/// Invariant: `cursor <= seen_high_water_mark <= len()`.
#[derive(Debug, Clone, Default)]
pub struct ReviewQueue {
    cards: Vec<Card>,
    cursor: usize,
    seen_high_water_mark: usize,
}

impl ReviewQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue pre-filled with cards, cursor at the first card.
    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            cards,
            cursor: 0,
            seen_high_water_mark: 0,
        }
    }

    pub fn append(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
    }

    /// Insert `card` between `min_offset` and `max_offset` positions ahead of
    /// the cursor, clamped to the end of the queue. Returns the index used.
    pub fn insert_ahead<R: Rng + ?Sized>(
        &mut self,
        card: Card,
        min_offset: usize,
        max_offset: usize,
        rng: &mut R,
    ) -> usize {
        let (low, high) = if min_offset <= max_offset {
            (min_offset, max_offset)
        } else {
            (max_offset, min_offset)
        };
        let offset = rng.random_range(low..=high);
        let index = (self.cursor + offset).min(self.cards.len());
        self.cards.insert(index, card);
        if index <= self.seen_high_water_mark {
            self.seen_high_water_mark += 1;
        }
        index
    }

    /// Move to the next card. Returns false at the end of the queue.
    pub fn advance(&mut self) -> bool {
        if self.cursor >= self.cards.len() {
            return false;
        }
        self.cursor += 1;
        self.seen_high_water_mark = self.seen_high_water_mark.max(self.cursor);
        true
    }

    /// Move to the previous card. Returns false at the start of the queue.
    pub fn retreat(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Whether a previously reached card lies ahead of the cursor.
    pub fn can_advance(&self) -> bool {
        self.cursor < self.seen_high_water_mark
    }

    pub fn can_retreat(&self) -> bool {
        self.cursor > 0
    }

    pub fn remaining_depth(&self) -> usize {
        self.cards.len() - self.cursor
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.cards.get(self.cursor)
    }

    /// Replace the word snapshot on every card for `word.id`. Order is untouched.
    pub fn patch_word(&mut self, word: &Word) -> usize {
        let mut patched = 0;
        for card in self.cards.iter_mut().filter(|c| c.word.id == word.id) {
            card.word = word.clone();
            patched += 1;
        }
        patched
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn seen_high_water_mark(&self) -> usize {
        self.seen_high_water_mark
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
