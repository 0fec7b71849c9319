//! Tunables shared by the controllers.

use std::time::Duration;

/// Controller timings and limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Quiet period before a typed record search is sent.
    pub search_debounce: Duration,
    /// Maximum number of record sets requested per search.
    pub max_records: u32,
    /// Display time of success/error toasts.
    pub toast_duration: Duration,
    /// How long the "data may be stale" notice stays up after a 429.
    pub rate_limit_notice: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            search_debounce: Duration::from_millis(500),
            max_records: 100,
            toast_duration: Duration::from_secs(5),
            rate_limit_notice: Duration::from_secs(5),
        }
    }
}
