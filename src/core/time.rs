//! Wall-clock time for credential expiry.
//!
//! Not used for ordering: cart transitions are sequenced by the session
//! thread, never by timestamps.

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
///
/// Copy is fine here - it's a measurement, not an ordering primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallClock(pub u64);

impl WallClock {
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self(ms)
    }

    /// Build from a seconds-resolution timestamp (credential `exp` claims).
    pub fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1000))
    }
}
