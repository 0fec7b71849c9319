//! Transient toast queue.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

/// How long toasts stay visible unless a caller asks otherwise.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(5);

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display duration of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastDuration {
    /// Removed automatically once this much time has passed.
    After(Duration),
    /// Stays until dismissed.
    Never,
}

/// Identifier returned by every push; used to dismiss early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ToastId(u64);

/// One queued toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub severity: Severity,
    pub message: String,
    pub duration: ToastDuration,
    pub created_at: Instant,
}

impl Toast {
    /// When the toast disappears, if ever.
    pub fn expires_at(&self) -> Option<Instant> {
        match self.duration {
            ToastDuration::After(d) => Some(self.created_at + d),
            ToastDuration::Never => None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at().is_some_and(|at| now >= at)
    }
}

#[derive(Debug)]
struct ToastQueue {
    next_id: u64,
    default_duration: Duration,
    entries: Vec<Toast>,
}

impl ToastQueue {
    fn prune(&mut self) {
        let now = Instant::now();
        self.entries.retain(|t| !t.is_expired(now));
    }
}

/// Shared handle to the toast queue.
///
/// Clones push into the same queue. Expiry is evaluated lazily whenever the
/// queue is read, against tokio's clock, so no timer task is involved.
#[derive(Debug, Clone)]
pub struct Notifier {
    queue: Arc<Mutex<ToastQueue>>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl Notifier {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            queue: Arc::new(Mutex::new(ToastQueue {
                next_id: 1,
                default_duration,
                entries: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ToastQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a toast. Newest goes last.
    pub fn push(
        &self,
        severity: Severity,
        message: impl Into<String>,
        duration: ToastDuration,
    ) -> ToastId {
        let message = message.into();
        match severity {
            Severity::Error => log::warn!("[toast] {message}"),
            _ => log::debug!("[toast:{severity}] {message}"),
        }

        let mut queue = self.lock();
        queue.prune();
        let id = ToastId(queue.next_id);
        queue.next_id += 1;
        queue.entries.push(Toast {
            id,
            severity,
            message,
            duration,
            created_at: Instant::now(),
        });
        id
    }

    fn push_default(&self, severity: Severity, message: impl Into<String>) -> ToastId {
        let duration = ToastDuration::After(self.lock().default_duration);
        self.push(severity, message, duration)
    }

    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.push_default(Severity::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.push_default(Severity::Error, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> ToastId {
        self.push_default(Severity::Warning, message)
    }

    pub fn info(&self, message: impl Into<String>) -> ToastId {
        self.push_default(Severity::Info, message)
    }

    /// Remove a toast before it expires. Returns whether it was still queued.
    pub fn dismiss(&self, id: ToastId) -> bool {
        let mut queue = self.lock();
        let before = queue.entries.len();
        queue.entries.retain(|t| t.id != id);
        queue.entries.len() != before
    }

    /// Visible toasts in insertion order.
    pub fn toasts(&self) -> Vec<Toast> {
        let mut queue = self.lock();
        queue.prune();
        queue.entries.clone()
    }

    /// Take every visible toast out of the queue.
    pub fn drain(&self) -> Vec<Toast> {
        let mut queue = self.lock();
        queue.prune();
        std::mem::take(&mut queue.entries)
    }

    pub fn is_empty(&self) -> bool {
        self.toasts().is_empty()
    }
}
