//! Coordinator logic: optimistic edits, revert on failure, reconciliation.
//!
//! The coordinator exclusively owns the canonical [`CartState`]. Every
//! user-initiated edit applies its transition synchronously (the UI sees the
//! new state before any network round trip), then commits asynchronously
//! through the remote worker. A failed commit reverts to the snapshot
//! captured when that specific edit was made, so out-of-order resolutions
//! cannot corrupt an unrelated edit's rollback target.

use std::collections::HashMap;
use std::sync::Arc;

use crossbeam::channel::Sender;

use super::cache::CartCache;
use super::credential::IdentityObserver;
use super::notify::{Notice, Notifier};
use super::remote::MutationError;
use super::worker::{CommitKind, RemoteOp};
use crate::core::{
    CartState, Direction, ProductId, ProductRef, RequestId, Transition, UserId, apply,
};

/// Pending optimistic commit awaiting its remote resolution.
struct PendingCommit {
    /// Snapshot captured immediately before this edit's transition.
    prior: CartState,
    kind: CommitKind,
}

/// Sequences cart edits against the remote order service.
pub struct CartCoordinator {
    state: CartState,
    pending: HashMap<RequestId, PendingCommit>,
    seen_generation: u64,
    last_identity: Option<UserId>,
    notifier: Arc<dyn Notifier>,
}

impl CartCoordinator {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: CartState::new(),
            pending: HashMap::new(),
            seen_generation: 0,
            last_identity: None,
            notifier,
        }
    }

    /// Read-only view of the current cart.
    pub fn cart(&self) -> &CartState {
        &self.state
    }

    /// Commits issued but not yet resolved.
    ///
    /// A commit whose remote call never resolves stays counted here
    /// forever; there is no timeout, so this is the embedder's only window
    /// into that condition.
    pub fn pending_commits(&self) -> usize {
        self.pending.len()
    }

    /// Add `quantity` of a product. Returns after the optimistic transition;
    /// the remote outcome arrives via [`complete_commit`](Self::complete_commit).
    pub fn add_item(
        &mut self,
        product: ProductRef,
        quantity: u32,
        ops: &Sender<RemoteOp>,
    ) -> RequestId {
        let kind = CommitKind::Add {
            id: product.id.clone(),
            quantity,
        };
        self.edit(Transition::Add { product, quantity }, kind, ops)
    }

    /// Remove a product's line entirely.
    pub fn remove_item(&mut self, id: ProductId, ops: &Sender<RemoteOp>) -> RequestId {
        let kind = CommitKind::Remove { id: id.clone() };
        self.edit(Transition::Remove { id }, kind, ops)
    }

    /// Step a line's quantity by one in the given direction.
    pub fn update_item(
        &mut self,
        direction: Direction,
        id: ProductId,
        ops: &Sender<RemoteOp>,
    ) -> RequestId {
        let kind = CommitKind::Update {
            id: id.clone(),
            direction,
        };
        self.edit(Transition::Update { id, direction }, kind, ops)
    }

    /// Place the order: optimistically empty the cart, commit remotely,
    /// restore the pre-checkout snapshot if the order fails.
    pub fn checkout(&mut self, ops: &Sender<RemoteOp>) -> RequestId {
        self.edit(Transition::Clear, CommitKind::Checkout, ops)
    }

    fn edit(
        &mut self,
        transition: Transition,
        kind: CommitKind,
        ops: &Sender<RemoteOp>,
    ) -> RequestId {
        let prior = self.state.clone();
        self.state = apply(std::mem::take(&mut self.state), transition);

        let request = RequestId::generate();
        self.pending.insert(request, PendingCommit { prior, kind: kind.clone() });
        let _ = ops.send(RemoteOp::Commit { request, kind });
        request
    }

    /// Resolve an in-flight commit.
    ///
    /// Success invalidates the cart cache so the next snapshot carries the
    /// authoritative server state. Failure reverts to the edit's own prior
    /// snapshot and emits exactly one failure notice.
    pub fn complete_commit(
        &mut self,
        request: RequestId,
        outcome: Result<(), MutationError>,
        cache: &mut CartCache,
        ops: &Sender<RemoteOp>,
    ) {
        let Some(pending) = self.pending.remove(&request) else {
            tracing::debug!(%request, "resolution for unknown commit, ignoring");
            return;
        };

        match outcome {
            Ok(()) => {
                tracing::debug!(%request, op = pending.kind.describe(), "commit confirmed");
                cache.invalidate(ops);
                if matches!(pending.kind, CommitKind::Checkout) {
                    self.notifier.notify(Notice::info("Order placed successfully"));
                }
            }
            Err(e) => {
                tracing::warn!(
                    %request,
                    op = pending.kind.describe(),
                    error = %e,
                    transience = ?e.transience(),
                    effect = e.effect().as_str(),
                    "commit failed, reverting"
                );
                self.state = apply(
                    std::mem::take(&mut self.state),
                    Transition::Revert {
                        prior: pending.prior,
                    },
                );
                self.notifier.notify(Notice::error(format!(
                    "{} failed: {e}",
                    pending.kind.describe()
                )));
            }
        }
    }

    /// Adopt the cache's snapshot if it has delivered a new one.
    ///
    /// Last snapshot wins, unconditionally: a load arriving while an edit's
    /// commit is still in flight overwrites the optimistic state. No merge
    /// is attempted.
    pub fn reconcile_cache(&mut self, cache: &CartCache) {
        if cache.generation() <= self.seen_generation {
            return;
        }
        if let Some(items) = cache.data() {
            self.state = apply(
                std::mem::take(&mut self.state),
                Transition::Load {
                    items: items.to_vec(),
                },
            );
        }
        self.seen_generation = cache.generation();
    }

    /// React to identity changes: a newly observed identity forces a cart
    /// refetch so the shopper's saved cart replaces whatever was local.
    ///
    /// Logout does not clear the local cart.
    pub fn reconcile_identity(
        &mut self,
        observer: &IdentityObserver,
        cache: &mut CartCache,
        ops: &Sender<RemoteOp>,
    ) {
        match observer.current_identity() {
            Some(identity) => {
                if self.last_identity.as_ref() != Some(&identity.user) {
                    tracing::info!(user = %identity.user, "identity changed, forcing cart refetch");
                    cache.refetch(ops);
                }
                self.last_identity = Some(identity.user);
            }
            None => {
                self.last_identity = None;
            }
        }
    }
}
