//! Error types for the review client.

use review_core::ConfigError;
use thiserror::Error;

/// Errors talking to the SRS service or loading client configuration.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors returned by review session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No card at the current position")]
    NoCurrentCard,

    #[error("Session has been closed")]
    Closed,

    #[error("Session still has words to review")]
    NotExhausted,

    #[error("Session is not complete yet")]
    NotComplete,

    #[error("Session completion already reported")]
    AlreadyReported,

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
