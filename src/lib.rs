#![forbid(unsafe_code)]

pub mod config;
pub mod core;
pub mod error;
pub mod sync;
pub mod telemetry;

pub use error::{Effect, Error, Transience};
pub type Result<T> = std::result::Result<T, Error>;

// Re-export the primary surface at crate root for convenience
pub use crate::config::Config;
pub use crate::core::{
    CartState, CoreError, Direction, LineItem, ProductId, ProductRef, RequestId, Transition,
    UserId, WallClock, apply,
};
pub use crate::sync::{
    CacheKey, CartCache, CartCoordinator, CartFetcher, CartSession, CommitKind, CredentialStore,
    FetchError, Identity, IdentityObserver, MemoryCredentialStore, MutationError, Notice,
    NoticeLog, Notifier, RemoteCartClient, Severity,
};
