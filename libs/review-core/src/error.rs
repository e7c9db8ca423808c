//! Error types for review-core.

use thiserror::Error;

/// Result type alias using ConfigError.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while building or validating engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("batch limit must be at least 1")]
    InvalidBatchLimit,

    #[error("invalid requeue range {min}..={max}")]
    InvalidRequeueRange { min: usize, max: usize },

    #[error("unknown interleave mode: {0}")]
    UnknownInterleaveMode(String),

    #[error("unknown comfort level: {0}")]
    UnknownComfortLevel(String),
}
