//! Core error types.

use thiserror::Error;

/// Invalid identifier, with the raw input and a human-readable reason.
#[derive(Debug, Error)]
pub enum InvalidId {
    #[error("invalid product id {raw:?}: {reason}")]
    Product { raw: String, reason: String },

    #[error("invalid user id {raw:?}: {reason}")]
    User { raw: String, reason: String },
}

/// Errors from the domain layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoreError {
    #[error(transparent)]
    InvalidId(#[from] InvalidId),
}
