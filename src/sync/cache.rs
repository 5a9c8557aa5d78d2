//! Freshness-tracked cache of the canonical cart snapshot.
//!
//! The cache never mutates the cart itself: it only holds the last snapshot
//! the order service confirmed, plus loading/error flags for the consuming
//! view. Fetches run on the remote worker thread; results come back through
//! the session pump as [`complete_fetch`](CartCache::complete_fetch) calls.

use std::fmt;
use std::time::{Duration, Instant};

use crossbeam::channel::Sender;
use thiserror::Error;

use super::worker::RemoteOp;
use crate::core::LineItem;
use crate::error::Transience;

/// Stable key for one cached remote resource.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({:?})", self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why the canonical snapshot could not be obtained.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("cart fetch failed: {reason}")]
    Unavailable { reason: String },

    #[error("cart payload malformed: {reason}")]
    Malformed { reason: String },
}

impl FetchError {
    pub fn transience(&self) -> Transience {
        match self {
            FetchError::Unavailable { .. } => Transience::Retryable,
            FetchError::Malformed { .. } => Transience::Permanent,
        }
    }
}

/// Fetches the canonical cart snapshot from the order service.
///
/// Runs on the remote worker thread; blocking is fine.
pub trait CartFetcher: Send + Sync {
    fn fetch(&self) -> Result<Vec<LineItem>, FetchError>;
}

/// Cached view of the canonical cart.
///
/// `generation` advances on every delivered snapshot, including ones with
/// identical contents - consumers reconcile on "new snapshot", not "changed
/// contents", so a refetch that confirms the current state still counts.
pub struct CartCache {
    key: CacheKey,
    stale_time: Duration,
    data: Option<Vec<LineItem>>,
    generation: u64,
    last_fetch: Option<Instant>,
    fetch_in_progress: bool,
    error: Option<FetchError>,
}

impl CartCache {
    /// Subscribe to a remote resource with the given staleness window.
    pub fn subscribe(key: CacheKey, stale_time: Duration) -> Self {
        Self {
            key,
            stale_time,
            data: None,
            generation: 0,
            last_fetch: None,
            fetch_in_progress: false,
            error: None,
        }
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Last delivered snapshot, if any. Survives fetch failures.
    pub fn data(&self) -> Option<&[LineItem]> {
        self.data.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.fetch_in_progress
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// Kick off a background fetch if the cached snapshot is stale.
    ///
    /// Non-blocking: returns immediately, the current snapshot stays
    /// readable until the fresh one lands.
    pub fn ensure_fresh(&mut self, ops: &Sender<RemoteOp>) {
        if self.fetch_in_progress {
            return;
        }
        let stale = self
            .last_fetch
            .map(|at| at.elapsed() >= self.stale_time)
            .unwrap_or(true);
        if stale {
            self.kick(ops);
        }
    }

    /// Force a background fetch now, regardless of freshness.
    pub fn refetch(&mut self, ops: &Sender<RemoteOp>) {
        if self.fetch_in_progress {
            return;
        }
        self.kick(ops);
    }

    /// Drop freshness and schedule a refetch.
    ///
    /// Called after every successful remote mutation so the next snapshot
    /// carries server-side derived fields the optimistic state can't know.
    /// If a fetch is already in flight the stale mark stays, and the next
    /// [`ensure_fresh`](Self::ensure_fresh) fires again.
    pub fn invalidate(&mut self, ops: &Sender<RemoteOp>) {
        self.last_fetch = None;
        if !self.fetch_in_progress {
            self.kick(ops);
        }
    }

    /// Apply the outcome of a background fetch.
    pub fn complete_fetch(&mut self, outcome: Result<Vec<LineItem>, FetchError>) {
        self.fetch_in_progress = false;
        match outcome {
            Ok(items) => {
                self.data = Some(items);
                self.generation += 1;
                self.error = None;
                self.last_fetch = Some(Instant::now());
            }
            Err(e) => {
                // Keep the cached snapshot; the error flag is for the view.
                // last_fetch is untouched, so the next TTL hit retries.
                tracing::debug!(key = %self.key, error = %e, "background cart fetch failed");
                self.error = Some(e);
            }
        }
    }

    fn kick(&mut self, ops: &Sender<RemoteOp>) {
        self.fetch_in_progress = true;
        let _ = ops.send(RemoteOp::Fetch {
            key: self.key.clone(),
        });
    }
}
