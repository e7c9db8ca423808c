//! Presentation ordering for freshly expanded cards.
//!
//! Plain shuffling clusters same-direction cards in small batches, so the
//! default `Balanced` mode alternates directions while keeping the order
//! within each direction random.

use std::cmp::Ordering;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Card, Direction};

/// How a batch of cards is ordered before it joins the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterleaveMode {
    Shuffle,
    Balanced,
}

impl Default for InterleaveMode {
    fn default() -> Self {
        Self::Balanced
    }
}

impl InterleaveMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shuffle => "shuffle",
            Self::Balanced => "balanced",
        }
    }
}

impl FromStr for InterleaveMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shuffle" => Ok(Self::Shuffle),
            "balanced" => Ok(Self::Balanced),
            other => Err(ConfigError::UnknownInterleaveMode(other.to_string())),
        }
    }
}

/// Arrange cards into presentation order. The output is a permutation of the input.
pub fn arrange<R: Rng + ?Sized>(mut cards: Vec<Card>, mode: InterleaveMode, rng: &mut R) -> Vec<Card> {
    match mode {
        InterleaveMode::Shuffle => {
            cards.shuffle(rng);
            cards
        }
        InterleaveMode::Balanced => balanced(cards, rng),
    }
}

fn balanced<R: Rng + ?Sized>(cards: Vec<Card>, rng: &mut R) -> Vec<Card> {
    let total = cards.len();
    let (mut forward, mut reverse): (Vec<Card>, Vec<Card>) = cards
        .into_iter()
        .partition(|card| card.direction == Direction::PromptToAnswer);
    forward.shuffle(rng);
    reverse.shuffle(rng);

    // The longer side leads so the leftover tail is as short as possible.
    let forward_leads = match forward.len().cmp(&reverse.len()) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => rng.random_bool(0.5),
    };
    let (lead, follow) = if forward_leads {
        (forward, reverse)
    } else {
        (reverse, forward)
    };

    let mut arranged = Vec::with_capacity(total);
    let mut lead = lead.into_iter();
    let mut follow = follow.into_iter();
    loop {
        match (lead.next(), follow.next()) {
            (None, None) => break,
            (a, b) => {
                arranged.extend(a);
                arranged.extend(b);
            }
        }
    }
    arranged
}
