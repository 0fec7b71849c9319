//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

use zonedash_api::RecordType;

// Re-export library error type
pub use zonedash_api::ApiError;

/// Why a record draft was refused before reaching the network.
///
/// `Display` yields the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule")]
pub enum ValidationError {
    #[error("Name and content are required")]
    MissingFields,

    #[error("{record_type} records cannot be created from the dashboard")]
    UnsupportedType { record_type: RecordType },

    #[error("Wildcard records are not allowed")]
    Wildcard,

    #[error("TTL must be at least 1 hour (3600 seconds)")]
    TtlTooLow,

    #[error("Invalid IPv4 address format")]
    InvalidIpv4,

    #[error("Invalid IPv6 address format")]
    InvalidIpv6,

    #[error("MX record must be in format: priority hostname (e.g., \"10 mail.example.com\")")]
    MxFormat,

    #[error("MX priority must be a number between 0 and 65535")]
    MxPriority,
}

impl ValidationError {
    /// Policy refusals are shown as warnings, malformed input as errors.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Wildcard)
    }
}

/// Core layer error type
#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Record draft failed local validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// API error (converting from library)
    #[error("{0}")]
    Api(#[from] ApiError),

    /// A remote call failed; `message` is the text shown to the user
    #[error("{message}")]
    Request { message: String, source: ApiError },

    /// Missing or malformed user input outside of record drafts
    #[error("{0}")]
    InvalidInput(String),

    /// Local storage error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, rejected request, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Validation(_) | Self::InvalidInput(_) => true,
            Self::Api(e) | Self::Request { source: e, .. } => e.is_expected(),
            Self::Storage(_) => false,
        }
    }

    /// Text shown to the user: the server's message verbatim for API errors.
    pub fn reason(&self) -> String {
        match self {
            Self::Api(e) => e.reason(),
            other => other.to_string(),
        }
    }

    /// The server's own message, when this came from an API answer that had one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api(e) | Self::Request { source: e, .. } => e.server_message(),
            _ => None,
        }
    }

    /// Wrap a failed call, showing the server's message or `fallback`.
    pub fn request(source: ApiError, fallback: &str) -> Self {
        let message = source.server_message().unwrap_or(fallback).to_string();
        Self::Request { message, source }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Result of a controller operation.
///
/// Controllers never return errors; by the time an `Outcome` is handed back the
/// matching notification has been emitted. Frontends use it to pick an exit
/// status or decide whether to keep a form open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The operation completed.
    Succeeded,
    /// Refused locally without a network call (validation, locked zone, empty input).
    Rejected(String),
    /// The server or the network failed the operation.
    Failed(String),
    /// An operation of the same kind is already in flight.
    Busy,
    /// The owning view was torn down before the answer arrived; the answer was ignored.
    Discarded,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Reason attached to a rejected or failed operation.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Rejected(msg) | Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}
