//! One shopper session: coordinator, cache, identity, and worker wiring.
//!
//! The session is the single logical thread of control. Edits and
//! reconciliation run here; only the remote round trips happen elsewhere
//! (on the worker thread), and their resolutions are folded back in by
//! [`pump`](CartSession::pump). Nothing is ever observed half-applied.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, unbounded};

use super::cache::{CacheKey, CartCache, CartFetcher};
use super::coordinator::CartCoordinator;
use super::credential::{CredentialStore, IdentityObserver};
use super::notify::Notifier;
use super::remote::RemoteCartClient;
use super::worker::{RemoteOp, RemoteResult, RemoteWorker, run_remote_loop};
use crate::config::Config;
use crate::core::{CartState, Direction, ProductId, ProductRef, RequestId};

/// Storefront cart session.
///
/// Construction spawns the remote worker thread, subscribes the cart cache,
/// and performs the session-start identity observation. Dropping the
/// session shuts the worker down.
pub struct CartSession {
    coordinator: CartCoordinator,
    cache: CartCache,
    identity: IdentityObserver,
    op_tx: Sender<RemoteOp>,
    result_rx: Receiver<RemoteResult>,
    worker: Option<JoinHandle<()>>,
}

impl CartSession {
    pub fn new(
        client: Arc<dyn RemoteCartClient>,
        fetcher: Arc<dyn CartFetcher>,
        credentials: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
        config: &Config,
    ) -> Self {
        let (op_tx, op_rx) = unbounded();
        let (result_tx, result_rx) = unbounded();

        let worker = RemoteWorker::new(client, fetcher, result_tx);
        let handle = std::thread::Builder::new()
            .name("cart-remote".into())
            .spawn(move || run_remote_loop(worker, op_rx))
            .expect("spawn remote worker thread");

        let mut session = Self {
            coordinator: CartCoordinator::new(notifier),
            cache: CartCache::subscribe(
                CacheKey::new(config.cache_key.clone()),
                Duration::from_millis(config.stale_time_ms),
            ),
            identity: IdentityObserver::new(credentials),
            op_tx,
            result_rx,
            worker: Some(handle),
        };

        // Session start: observe the stored credential, then get a first
        // snapshot going either way.
        session
            .coordinator
            .reconcile_identity(&session.identity, &mut session.cache, &session.op_tx);
        session.cache.ensure_fresh(&session.op_tx);
        session
    }

    /// Read-only view of the current cart.
    pub fn cart(&self) -> &CartState {
        self.coordinator.cart()
    }

    /// Cache flags for the consuming view (loading/error state).
    pub fn cache(&self) -> &CartCache {
        &self.cache
    }

    pub fn pending_commits(&self) -> usize {
        self.coordinator.pending_commits()
    }

    pub fn add_item(&mut self, product: ProductRef, quantity: u32) -> RequestId {
        self.coordinator.add_item(product, quantity, &self.op_tx)
    }

    pub fn remove_item(&mut self, id: ProductId) -> RequestId {
        self.coordinator.remove_item(id, &self.op_tx)
    }

    pub fn update_item(&mut self, direction: Direction, id: ProductId) -> RequestId {
        self.coordinator.update_item(direction, id, &self.op_tx)
    }

    pub fn checkout(&mut self) -> RequestId {
        self.coordinator.checkout(&self.op_tx)
    }

    /// Re-observe the stored credential. Call after login or logout.
    pub fn refresh_identity(&mut self) {
        self.coordinator
            .reconcile_identity(&self.identity, &mut self.cache, &self.op_tx);
    }

    /// Kick a background refetch if the cached snapshot has gone stale.
    pub fn refresh_if_stale(&mut self) {
        self.cache.ensure_fresh(&self.op_tx);
    }

    /// Fold in every resolution that has already arrived, without blocking.
    ///
    /// Returns the number of resolutions processed.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(result) = self.result_rx.try_recv() {
            self.handle_result(result);
            processed += 1;
        }
        processed
    }

    /// Block until in-flight work resolves or the deadline passes.
    ///
    /// Waits for pending commits and any in-flight fetch, including fetches
    /// scheduled by the resolutions themselves (a successful commit
    /// invalidates the cache, which schedules another fetch). Returns true
    /// if everything settled.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.pending_commits() > 0 || self.cache.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.result_rx.recv_timeout(remaining) {
                Ok(result) => self.handle_result(result),
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    fn handle_result(&mut self, result: RemoteResult) {
        match result {
            RemoteResult::Commit { request, outcome } => {
                self.coordinator
                    .complete_commit(request, outcome, &mut self.cache, &self.op_tx);
            }
            RemoteResult::Fetch { key, outcome } => {
                if &key != self.cache.key() {
                    tracing::debug!(%key, "fetch result for unknown cache key, ignoring");
                    return;
                }
                self.cache.complete_fetch(outcome);
                self.coordinator.reconcile_cache(&self.cache);
            }
        }
    }
}

impl Drop for CartSession {
    fn drop(&mut self) {
        let _ = self.op_tx.send(RemoteOp::Shutdown);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}
