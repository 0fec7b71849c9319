//! zonedash Core Library
//!
//! Platform-independent logic of the zonedash DNS hosting dashboard:
//! - Record validation before anything is sent
//! - Notifications (toasts) and confirmation dialogs
//! - Zone list, zone detail and public stats controllers
//! - Auth and DNS checker services
//!
//! Frontends build a [`ServiceContext`] around an API client, a navigator and
//! an export sink, then drive the controllers from their own event loop.

pub mod context;
pub mod controllers;
pub mod debounce;
pub mod error;
pub mod notify;
pub mod options;
pub mod services;
pub mod traits;
pub mod validation;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use context::ServiceContext;
pub use error::{CoreError, CoreResult, Outcome, ValidationError};
pub use options::ControllerOptions;
pub use traits::ExportSink;
pub use validation::{RecordDraft, validate_record};
