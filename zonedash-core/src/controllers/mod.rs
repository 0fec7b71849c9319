//! View controllers. Each owns the state of one screen and reports through the
//! shared [`Notifier`](crate::notify::Notifier).

mod stats;
mod zone_detail;
mod zone_list;

pub use stats::{StatsController, StatsView, format_count, format_latency, format_uptime};
pub use zone_detail::{
    EXPECTED_NAMESERVERS, InFlight, METADATA_FAILED, PendingAction, RecordUsage,
    VerificationFailure, ZONE_LOCKED, ZoneDetailController, ZoneDetailSnapshot,
};
pub use zone_list::{LIST_FAILED, LoadPhase, ZoneListController, ZoneListSnapshot, ZoneSummary};
