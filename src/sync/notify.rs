//! User-visible notices.
//!
//! The engine never renders; it hands notices to a sink the embedder
//! provides. Exactly one failure notice is emitted per failed edit.

use std::sync::Mutex;

/// Notice severity. `Error` notices accompany a revert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// One user-visible notice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Sink for notices. Implementations must tolerate delivery from the
/// session thread while the UI reads elsewhere.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Collects notices in memory. The default sink for embedders that poll,
/// and the assertion point in tests.
#[derive(Default)]
pub struct NoticeLog {
    inner: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all accumulated notices, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        match self.inner.lock() {
            Ok(mut notices) => std::mem::take(&mut *notices),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|notices| notices.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.inner.lock() {
            notices.push(notice);
        }
    }
}
