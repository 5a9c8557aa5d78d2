//! Identity observation from a locally stored credential.
//!
//! The credential is a JWT-shaped token: three dot-separated base64url
//! segments with JSON claims in the middle one. We decode and expiry-check
//! only - the signature was checked by the service that issued the token,
//! and a forged token buys nothing because every remote call is authorized
//! server-side.

use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use thiserror::Error;

use crate::core::{UserId, WallClock};

/// Why a stored credential could not be turned into an identity.
///
/// Never surfaced to the shopper: any decode failure is treated as
/// "logged out".
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("credential malformed: {reason}")]
    Malformed { reason: String },

    #[error("credential expired at {expired_at:?}")]
    Expired { expired_at: WallClock },
}

/// The authenticated shopper, as decoded from the credential claims.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub user: UserId,
    pub name: String,
    pub email: String,
    /// When the credential stops being valid.
    pub expires: WallClock,
}

/// Where the credential lives. The embedder owns persistence; the engine
/// only ever reads.
pub trait CredentialStore: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// In-memory credential store: the login/logout surface for embedders
/// without platform storage, and the fixture for tests.
#[derive(Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly issued token (login).
    pub fn set(&self, token: impl Into<String>) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token.into());
        }
    }

    /// Discard the token (logout).
    pub fn clear(&self) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|slot| slot.clone())
    }
}

#[derive(Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    /// Seconds since the Unix epoch.
    exp: u64,
}

/// Observes the current identity from the credential store.
///
/// No push notifications: callers poll at defined trigger points (session
/// start, post-login).
pub struct IdentityObserver {
    store: Arc<dyn CredentialStore>,
}

impl IdentityObserver {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// The current identity, or `None` if the credential is absent,
    /// malformed, or expired.
    pub fn current_identity(&self) -> Option<Identity> {
        let token = self.store.token()?;
        match decode(&token, WallClock::now()) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::debug!(error = %e, "stored credential unusable, treating as logged out");
                None
            }
        }
    }
}

/// Decode a token against the given clock reading.
pub fn decode(token: &str, now: WallClock) -> Result<Identity, CredentialError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(CredentialError::Malformed {
            reason: "expected three dot-separated segments".into(),
        });
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| CredentialError::Malformed {
            reason: format!("payload is not base64url: {e}"),
        })?;
    let claims: Claims =
        serde_json::from_slice(&bytes).map_err(|e| CredentialError::Malformed {
            reason: format!("claims are not valid JSON: {e}"),
        })?;

    let expires = WallClock::from_secs(claims.exp);
    if now >= expires {
        return Err(CredentialError::Expired {
            expired_at: expires,
        });
    }

    let user = UserId::new(claims.sub).map_err(|e| CredentialError::Malformed {
        reason: e.to_string(),
    })?;

    Ok(Identity {
        user,
        name: claims.name,
        email: claims.email,
        expires,
    })
}
