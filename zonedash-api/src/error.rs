use serde::{Deserialize, Serialize};

/// Unified error type for every call made through the API client.
///
/// All variants are serializable for structured error reporting. The client never
/// retries on its own: every variant is handed back to the caller, which decides
/// whether the user should re-invoke the action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ApiError {
    /// The server answered HTTP 401.
    ///
    /// By the time the caller sees this, the session token has already been
    /// discarded and the navigator redirected to the login entry point.
    Unauthorized {
        /// Original error message from the server, if available.
        raw_message: Option<String>,
    },

    /// The server answered HTTP 429.
    RateLimited {
        /// Suggested wait time in seconds, from the `Retry-After` header.
        retry_after: Option<u64>,
        /// Original error message from the server, if available.
        raw_message: Option<String>,
    },

    /// Any other non-2xx answer (duplicate zone, record limit reached, failed
    /// verification, ...).
    Rejected {
        /// HTTP status code.
        status: u16,
        /// The server's `error` (or `message`) field, verbatim.
        message: Option<String>,
        /// Nameservers currently observed for the zone, sent along with a
        /// failed verification.
        current: Option<Vec<String>>,
    },

    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// Failed to parse the server's response.
    ParseError {
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Details about the serialization failure.
        detail: String,
    },

    /// The persisted session token could not be read or written.
    SessionStorage {
        /// Details about the storage failure.
        detail: String,
    },
}

impl ApiError {
    /// Whether this is expected behavior (bad input, conflict, expired session),
    /// used to pick the log level.
    ///
    /// `true` should be logged at `warn`, `false` at `error`.
    /// **Keep this in sync when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Unauthorized { .. } | Self::RateLimited { .. } => true,
            Self::Rejected { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }

    /// The message the server supplied, if any.
    ///
    /// Callers show this verbatim and fall back to their own wording otherwise.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { raw_message } | Self::RateLimited { raw_message, .. } => {
                raw_message.as_deref()
            }
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Nameservers the server observed for the zone, when a verification fails.
    pub fn current_nameservers(&self) -> Option<&[String]> {
        match self {
            Self::Rejected {
                current: Some(ns), ..
            } => Some(ns.as_slice()),
            _ => None,
        }
    }

    /// The HTTP status that produced this error, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::RateLimited { .. } => Some(429),
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human readable reason: the server's message when present, else this error's
    /// own description.
    pub fn reason(&self) -> String {
        self.server_message()
            .map_or_else(|| self.to_string(), ToString::to_string)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Unauthorized: {msg}")
                } else {
                    write!(f, "Unauthorized")
                }
            }
            Self::RateLimited { retry_after, .. } => {
                if let Some(secs) = retry_after {
                    write!(f, "Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "Rate limited")
                }
            }
            Self::Rejected {
                status, message, ..
            } => {
                if let Some(msg) = message {
                    write!(f, "HTTP {status}: {msg}")
                } else {
                    write!(f, "Request failed with status code {status}")
                }
            }
            Self::NetworkError { detail } => write!(f, "Network error: {detail}"),
            Self::Timeout { detail } => write!(f, "Request timeout: {detail}"),
            Self::ParseError { detail } => write!(f, "Parse error: {detail}"),
            Self::SerializationError { detail } => write!(f, "Serialization error: {detail}"),
            Self::SessionStorage { detail } => write!(f, "Session storage error: {detail}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Convenience type alias for `Result<T, ApiError>`.
pub type Result<T> = std::result::Result<T, ApiError>;
