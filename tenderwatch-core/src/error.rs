//! Error types for tenderwatch-core.

use thiserror::Error;

use crate::types::TenderId;

/// Rejection reasons for a tender or user identifier read from outside the
/// process (CLI arguments, server JSON, form values).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// Nothing left after trimming whitespace.
    #[error("identifier is empty")]
    Empty,

    /// Input is not an integer (or does not fit in 64 bits).
    #[error("identifier '{input}' is not a number")]
    NotNumeric { input: String },

    /// Input is an integer but zero or negative.
    #[error("identifier must be positive, got {value}")]
    NotPositive { value: i64 },
}

/// Rejection reasons for a tag name typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// Nothing left after trimming whitespace.
    #[error("tag name can not be empty")]
    Empty,
}

/// All errors that can arise from follower store operations.
#[derive(Debug, Error)]
pub enum FollowerError {
    /// No diff has been initialized for this tender.
    #[error("no follower state for tender {tender}")]
    UnknownTender { tender: TenderId },

    /// JSON serialization error (payload encoding).
    #[error("follower payload JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
