//! Cart synchronization - the coordination layer.
//!
//! Provides:
//! - Optimistic edits with revert-on-failure (coordinator)
//! - Freshness-tracked canonical snapshots (cache)
//! - Remote worker thread for commits and fetches
//! - Identity observation from a stored credential
//! - User-visible notices

pub mod cache;
pub mod coordinator;
pub mod credential;
pub mod notify;
pub mod remote;
pub mod session;
pub mod worker;

pub use cache::{CacheKey, CartCache, CartFetcher, FetchError};
pub use coordinator::CartCoordinator;
pub use credential::{
    CredentialError, CredentialStore, Identity, IdentityObserver, MemoryCredentialStore,
};
pub use notify::{Notice, NoticeLog, Notifier, Severity};
pub use remote::{MutationError, RemoteCartClient};
pub use session::CartSession;
pub use worker::{CommitKind, RemoteOp, RemoteResult, RemoteWorker, run_remote_loop};
