//! Client contract for the remote order service.

use thiserror::Error;

use crate::core::{Direction, ProductId};
use crate::error::{Effect, Transience};

/// Why a remote mutation failed.
///
/// The detail is used for logging and notices only; callers never branch on
/// it beyond "failed".
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MutationError {
    /// The order service processed the request and said no.
    #[error("order service rejected the mutation: {reason}")]
    Rejected { reason: String },

    /// The request never produced a definitive answer.
    #[error("order service unreachable: {reason}")]
    Unreachable { reason: String },
}

impl MutationError {
    pub fn transience(&self) -> Transience {
        match self {
            MutationError::Rejected { .. } => Transience::Permanent,
            MutationError::Unreachable { .. } => Transience::Retryable,
        }
    }

    pub fn effect(&self) -> Effect {
        match self {
            MutationError::Rejected { .. } => Effect::None,
            MutationError::Unreachable { .. } => Effect::Unknown,
        }
    }
}

/// Remote cart mutation client. Each call is a single network round trip
/// against the order service and holds no local state.
///
/// Implementations run on the remote worker thread, so blocking calls are
/// fine here.
pub trait RemoteCartClient: Send + Sync {
    fn commit_add(&self, id: &ProductId, quantity: u32) -> Result<(), MutationError>;

    fn commit_remove(&self, id: &ProductId) -> Result<(), MutationError>;

    fn commit_update(&self, id: &ProductId, direction: Direction) -> Result<(), MutationError>;

    /// Place the order for the current server-side cart.
    fn commit_checkout(&self) -> Result<(), MutationError>;
}
