//! Review-queue engine core shared by review clients.
//!
//! Provides:
//! - Word and card types mirrored from the SRS service
//! - Card expansion into both recall directions
//! - Batch interleaving (shuffled or direction-balanced)
//! - A navigable review queue with randomized requeueing
//! - Session completion tracking

pub mod config;
pub mod error;
pub mod expander;
pub mod interleave;
pub mod queue;
pub mod session;
pub mod types;

pub use config::EngineConfig;
pub use error::{ConfigError, Result};
pub use expander::expand;
pub use interleave::{arrange, InterleaveMode};
pub use queue::ReviewQueue;
pub use session::{SessionState, SessionTracker};
pub use types::{Card, ComfortLevel, Direction, IntervalPreview, Word, WordId};
