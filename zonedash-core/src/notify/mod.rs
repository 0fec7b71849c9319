//! User feedback: toasts for outcomes, a confirmation dialog for destructive actions.

mod confirm;
mod toast;

pub use confirm::{ConfirmDialog, ConfirmRequest, Tone};
pub use toast::{DEFAULT_TOAST_DURATION, Notifier, Severity, Toast, ToastDuration, ToastId};
