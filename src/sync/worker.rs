//! Remote worker for background commit and fetch operations.
//!
//! Owns the remote client and fetcher handles and runs on a dedicated
//! thread. Receives RemoteOp messages from the session thread, sends
//! results back. All cart state lives on the session side; the worker only
//! talks to the order service.

use std::sync::Arc;

use crossbeam::channel::{Receiver, Sender};

use super::cache::{CacheKey, CartFetcher, FetchError};
use super::remote::{MutationError, RemoteCartClient};
use crate::core::{Direction, LineItem, ProductId, RequestId};

/// One remote mutation, matching the optimistic transition already applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitKind {
    Add { id: ProductId, quantity: u32 },
    Remove { id: ProductId },
    Update { id: ProductId, direction: Direction },
    Checkout,
}

impl CommitKind {
    /// Short label for logs and failure notices.
    pub fn describe(&self) -> &'static str {
        match self {
            CommitKind::Add { .. } => "add to cart",
            CommitKind::Remove { .. } => "remove from cart",
            CommitKind::Update { .. } => "update cart",
            CommitKind::Checkout => "checkout",
        }
    }
}

/// Operations sent from the session thread to the remote worker.
pub enum RemoteOp {
    /// Commit an already-applied optimistic edit (non-blocking - result
    /// sent via the result channel).
    Commit {
        request: RequestId,
        kind: CommitKind,
    },

    /// Background snapshot fetch (non-blocking - result sent via the
    /// result channel).
    Fetch { key: CacheKey },

    /// Shutdown the worker thread.
    Shutdown,
}

/// Results sent from the remote worker back to the session thread.
pub enum RemoteResult {
    /// A commit resolved.
    Commit {
        request: RequestId,
        outcome: Result<(), MutationError>,
    },

    /// A background fetch resolved.
    Fetch {
        key: CacheKey,
        outcome: Result<Vec<LineItem>, FetchError>,
    },
}

/// Remote worker that owns the order-service handles.
pub struct RemoteWorker {
    client: Arc<dyn RemoteCartClient>,
    fetcher: Arc<dyn CartFetcher>,

    /// Channel to send results back to the session thread.
    result_tx: Sender<RemoteResult>,
}

impl RemoteWorker {
    pub fn new(
        client: Arc<dyn RemoteCartClient>,
        fetcher: Arc<dyn CartFetcher>,
        result_tx: Sender<RemoteResult>,
    ) -> Self {
        Self {
            client,
            fetcher,
            result_tx,
        }
    }

    fn commit(&self, kind: &CommitKind) -> Result<(), MutationError> {
        match kind {
            CommitKind::Add { id, quantity } => self.client.commit_add(id, *quantity),
            CommitKind::Remove { id } => self.client.commit_remove(id),
            CommitKind::Update { id, direction } => self.client.commit_update(id, *direction),
            CommitKind::Checkout => self.client.commit_checkout(),
        }
    }

    /// Process a single RemoteOp.
    fn handle_op(&mut self, op: RemoteOp) -> bool {
        match op {
            RemoteOp::Commit { request, kind } => {
                let outcome = self.commit(&kind);
                let _ = self.result_tx.send(RemoteResult::Commit { request, outcome });
            }

            RemoteOp::Fetch { key } => {
                let outcome = self.fetcher.fetch();
                let _ = self.result_tx.send(RemoteResult::Fetch { key, outcome });
            }

            RemoteOp::Shutdown => {
                return false; // Signal to exit loop
            }
        }
        true // Continue processing
    }
}

/// Run the remote thread loop.
///
/// Processes RemoteOp messages until Shutdown is received or the op channel
/// closes.
pub fn run_remote_loop(mut worker: RemoteWorker, op_rx: Receiver<RemoteOp>) {
    for op in op_rx {
        if !worker.handle_op(op) {
            break;
        }
    }
}
