//! Review client: drives flashcard review sessions against a remote SRS service.
//!
//! Provides:
//! - The `SrsApi` seam and its REST/JSON implementation
//! - `ReviewSession`, the self-refilling, self-correcting review queue
//! - Environment-based client configuration

pub mod api;
pub mod config;
pub mod error;
pub mod session;

pub use api::{BatchSource, HttpSrsClient, SrsApi};
pub use config::ClientConfig;
pub use error::{ClientError, Result, SessionError};
pub use session::{
    CardView, GradeReceipt, RefillOutcome, ReviewSession, SessionEvent, SessionSnapshot,
    SessionStatus, SessionSummary,
};

pub use review_core;
