//! Error kinds surfaced at the crate's boundaries.
//!
//! The scorer itself never raises on well-formed input (missing fields just
//! contribute zero, per the scoring contract); `MatchError` exists for the
//! edges around it: malformed requests, per-item batch failures, per-item
//! timeouts, and trace lookups.

use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("item {request_id} failed: {reason}")]
    Item { request_id: String, reason: String },

    #[error("item {request_id} timed out after {elapsed:?}")]
    Timeout {
        request_id: String,
        elapsed: Duration,
    },

    #[error("no trace found for session {session_id}")]
    NotFound { session_id: Uuid },
}

pub type MatchResult<T> = std::result::Result<T, MatchError>;
