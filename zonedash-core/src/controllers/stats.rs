//! Public name server counters shown on the landing page.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::time::Instant;
use zonedash_api::{ApiError, PublicStats};

use crate::context::ServiceContext;
use crate::controllers::LoadPhase;
use crate::error::Outcome;

/// Counters formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub total_queries: String,
    pub total_zones: String,
    pub total_records: String,
    pub udp_answers: String,
    pub tcp_answers: String,
    pub avg_latency: String,
    pub uptime: String,
}

impl From<&PublicStats> for StatsView {
    fn from(stats: &PublicStats) -> Self {
        Self {
            total_queries: format_count(stats.total_queries),
            total_zones: format_count(stats.total_zones),
            total_records: format_count(stats.total_records),
            udp_answers: format_count(stats.udp_answers),
            tcp_answers: format_count(stats.tcp_answers),
            avg_latency: format_latency(stats.avg_latency),
            uptime: format_uptime(stats.uptime),
        }
    }
}

#[derive(Debug, Default)]
struct StatsState {
    phase: LoadPhase,
    stats: PublicStats,
    /// Set by a 429; the last counters are kept but may be stale.
    rate_limited: bool,
    notice_until: Option<Instant>,
}

/// Public stats controller
///
/// The server caches these counters for hours, so there is no polling; the
/// frontend calls [`refresh`](Self::refresh) once when the view opens.
pub struct StatsController {
    ctx: Arc<ServiceContext>,
    state: RwLock<StatsState>,
}

impl StatsController {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            ctx,
            state: RwLock::new(StatsState::default()),
        }
    }

    /// Fetch the counters. Previous counters survive a failure.
    pub async fn refresh(&self) -> Outcome {
        {
            let mut state = self.state.write().await;
            if state.phase.is_loading() {
                return Outcome::Busy;
            }
            state.phase = LoadPhase::Loading;
        }

        let result = self.ctx.public_api.public_stats().await;

        let mut state = self.state.write().await;
        match result {
            Ok(stats) => {
                state.stats = stats;
                state.rate_limited = false;
                state.phase = LoadPhase::Loaded;
                Outcome::Succeeded
            }
            Err(e) => {
                if matches!(e, ApiError::RateLimited { .. }) {
                    log::warn!("Stats rate limited, showing cached counters");
                    state.rate_limited = true;
                    state.notice_until = Some(Instant::now() + self.ctx.options.rate_limit_notice);
                } else {
                    log::error!("Failed to fetch stats: {e}");
                }
                let reason = e.reason();
                state.phase = LoadPhase::Errored(reason.clone());
                Outcome::Failed(reason)
            }
        }
    }

    /// Whether the "data may be outdated" notice is still up.
    pub async fn rate_limit_notice_visible(&self) -> bool {
        self.state
            .read()
            .await
            .notice_until
            .is_some_and(|until| Instant::now() < until)
    }

    /// Whether the last refresh was refused with a 429.
    pub async fn is_rate_limited(&self) -> bool {
        self.state.read().await.rate_limited
    }

    pub async fn stats(&self) -> PublicStats {
        self.state.read().await.stats.clone()
    }

    pub async fn view(&self) -> StatsView {
        StatsView::from(&self.state.read().await.stats)
    }

    pub async fn phase(&self) -> LoadPhase {
        self.state.read().await.phase.clone()
    }
}

/// `"2d 3h"` past a day, `"3h 25m"` below, `"0h"` for zero.
pub fn format_uptime(seconds: u64) -> String {
    if seconds == 0 {
        return "0h".to_string();
    }
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3600;
    if days > 0 {
        return format!("{days}d {hours}h");
    }
    let minutes = (seconds % 3600) / 60;
    format!("{hours}h {minutes}m")
}

/// Microseconds shown as milliseconds with two decimals.
pub fn format_latency(micros: f64) -> String {
    if micros == 0.0 || !micros.is_finite() {
        return "0ms".to_string();
    }
    format!("{:.2}ms", micros / 1000.0)
}

/// Integer with `,` thousands separators.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_utils::{Harness, MockZoneApi, network_down};

    fn sample_stats() -> PublicStats {
        PublicStats {
            total_queries: 1_234_567,
            total_zones: 42,
            total_records: 1_000,
            uptime: 2 * 86_400 + 3 * 3600 + 59,
            avg_latency: 1234.0,
            udp_answers: 999,
            tcp_answers: 0,
        }
    }

    // ---- formatting ----

    #[test]
    fn uptime_formats() {
        assert_eq!(format_uptime(0), "0h");
        assert_eq!(format_uptime(59), "0h 0m");
        assert_eq!(format_uptime(3 * 3600 + 25 * 60), "3h 25m");
        assert_eq!(format_uptime(86_400), "1d 0h");
        assert_eq!(format_uptime(2 * 86_400 + 3 * 3600 + 1800), "2d 3h");
    }

    #[test]
    fn latency_formats() {
        assert_eq!(format_latency(0.0), "0ms");
        assert_eq!(format_latency(1234.0), "1.23ms");
        assert_eq!(format_latency(500.0), "0.50ms");
        assert_eq!(format_latency(f64::NAN), "0ms");
    }

    #[test]
    fn count_formats() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
        assert_eq!(format_count(100_000), "100,000");
    }

    // ---- refresh ----

    #[tokio::test]
    async fn refresh_loads_counters() {
        let h = Harness::new(MockZoneApi::new());
        h.public.set_stats(sample_stats());
        let stats = StatsController::new(h.ctx.clone());

        assert_eq!(stats.refresh().await, Outcome::Succeeded);
        let view = stats.view().await;
        assert_eq!(view.total_queries, "1,234,567");
        assert_eq!(view.uptime, "2d 3h");
        assert_eq!(view.avg_latency, "1.23ms");
        assert!(!stats.is_rate_limited().await);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_notice_clears_after_window() {
        let h = Harness::new(MockZoneApi::new());
        h.public.set_stats(sample_stats());
        let stats = StatsController::new(h.ctx.clone());
        stats.refresh().await;

        h.public.fail(
            "public_stats",
            ApiError::RateLimited {
                retry_after: None,
                raw_message: None,
            },
        );
        assert!(matches!(stats.refresh().await, Outcome::Failed(_)));
        assert!(stats.is_rate_limited().await);
        assert!(stats.rate_limit_notice_visible().await);
        // cached counters stay on screen
        assert_eq!(stats.stats().await.total_zones, 42);
        // no generic toast for a 429
        assert!(h.ctx.notifier.is_empty());

        tokio::time::advance(Duration::from_millis(4900)).await;
        assert!(stats.rate_limit_notice_visible().await);
        tokio::time::advance(Duration::from_millis(200)).await;
        assert!(!stats.rate_limit_notice_visible().await);
        assert!(stats.is_rate_limited().await);

        h.public.clear_failure("public_stats");
        stats.refresh().await;
        assert!(!stats.is_rate_limited().await);
    }

    #[tokio::test]
    async fn other_failures_only_log() {
        let h = Harness::new(MockZoneApi::new());
        h.public.fail("public_stats", network_down());
        let stats = StatsController::new(h.ctx.clone());

        assert!(matches!(stats.refresh().await, Outcome::Failed(_)));
        assert!(!stats.rate_limit_notice_visible().await);
        assert!(h.ctx.notifier.is_empty());
        assert_eq!(stats.view().await.uptime, "0h");
    }
}
