//! Engine tuning parameters.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::interleave::InterleaveMode;

/// Tunables for queue refill and requeue behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Words requested per batch fetch.
    pub batch_limit: u32,
    /// Refill once this many cards or fewer remain ahead of the cursor.
    pub refill_threshold: usize,
    pub requeue_min_offset: usize,
    pub requeue_max_offset: usize,
    pub interleave: InterleaveMode,
    /// Fixed RNG seed; `None` seeds from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_limit: 20,
            refill_threshold: 10,
            requeue_min_offset: 5,
            requeue_max_offset: 10,
            interleave: InterleaveMode::default(),
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_limit == 0 {
            return Err(ConfigError::InvalidBatchLimit);
        }
        if self.requeue_min_offset == 0 || self.requeue_min_offset > self.requeue_max_offset {
            return Err(ConfigError::InvalidRequeueRange {
                min: self.requeue_min_offset,
                max: self.requeue_max_offset,
            });
        }
        Ok(())
    }
}
