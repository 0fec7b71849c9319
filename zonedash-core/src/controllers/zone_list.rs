//! Dashboard zone list.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use zonedash_api::{Zone, ZoneStatus};

use crate::context::ServiceContext;
use crate::error::Outcome;

/// Shown when the zone list cannot be fetched, whatever the cause.
pub const LIST_FAILED: &str = "Failed to fetch zones. Please check your connection.";

/// Loading state of a remote view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored(String),
}

impl LoadPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Errored(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Dashboard quick stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ZoneSummary {
    pub total: usize,
    pub pending: usize,
    pub active: usize,
}

impl ZoneSummary {
    pub fn of(zones: &[Zone]) -> Self {
        let active = zones.iter().filter(|z| z.status.is_active()).count();
        let pending = zones
            .iter()
            .filter(|z| z.status == ZoneStatus::PendingVerification)
            .count();
        Self {
            total: zones.len(),
            pending,
            active,
        }
    }
}

/// Point-in-time copy of the list state.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneListSnapshot {
    pub phase: LoadPhase,
    pub zones: Vec<Zone>,
    pub filter: String,
    pub creating: bool,
}

impl ZoneListSnapshot {
    /// Zones whose name contains the filter, ignoring case.
    pub fn visible_zones(&self) -> Vec<&Zone> {
        filter_zones(&self.zones, &self.filter)
    }
}

fn filter_zones<'a>(zones: &'a [Zone], filter: &str) -> Vec<&'a Zone> {
    let needle = filter.to_lowercase();
    zones
        .iter()
        .filter(|z| z.name.to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Default)]
struct ListState {
    phase: LoadPhase,
    zones: Vec<Zone>,
    filter: String,
    creating: bool,
    /// Bumped per fetch; only the newest fetch may write the list.
    generation: u64,
}

/// Zone list controller
///
/// Loads every zone of the signed-in user, filters locally by name and creates
/// zones. The list is never patched locally; a successful create re-fetches it.
pub struct ZoneListController {
    ctx: Arc<ServiceContext>,
    state: RwLock<ListState>,
}

impl ZoneListController {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            ctx,
            state: RwLock::new(ListState::default()),
        }
    }

    /// Fetch all zones. No automatic retry; call again to retry.
    pub async fn list_zones(&self) -> Outcome {
        if self.state.read().await.phase.is_loading() {
            return Outcome::Busy;
        }
        self.fetch().await
    }

    async fn fetch(&self) -> Outcome {
        let generation = {
            let mut state = self.state.write().await;
            state.phase = LoadPhase::Loading;
            state.generation += 1;
            state.generation
        };

        let result = self.ctx.zone_api.list_zones().await;

        let mut state = self.state.write().await;
        if state.generation != generation {
            return Outcome::Discarded;
        }
        match result {
            Ok(zones) => {
                log::debug!("Loaded {} zones", zones.len());
                state.zones = zones;
                state.phase = LoadPhase::Loaded;
                Outcome::Succeeded
            }
            Err(e) => {
                if e.is_expected() {
                    log::warn!("Failed to list zones: {e}");
                } else {
                    log::error!("Failed to list zones: {e}");
                }
                state.phase = LoadPhase::Errored(LIST_FAILED.to_string());
                Outcome::Failed(LIST_FAILED.to_string())
            }
        }
    }

    /// Create a zone, then re-fetch the list.
    ///
    /// An empty name is refused silently. Uniqueness is left to the server.
    pub async fn create_zone(&self, name: &str) -> Outcome {
        let name = name.trim();
        if name.is_empty() {
            return Outcome::Rejected("Zone name is required".to_string());
        }

        {
            let mut state = self.state.write().await;
            if state.creating {
                return Outcome::Busy;
            }
            state.creating = true;
        }

        let result = self.ctx.zone_api.create_zone(name).await;
        self.state.write().await.creating = false;

        match result {
            Ok(zone) => {
                log::info!("Zone {} created ({})", zone.name, zone.id);
                self.ctx
                    .notifier
                    .success(format!("Zone \"{name}\" created successfully"));
                self.fetch().await;
                Outcome::Succeeded
            }
            Err(e) => {
                let reason = e.reason();
                self.ctx
                    .notifier
                    .error(format!("Failed to create zone: {reason}"));
                Outcome::Failed(reason)
            }
        }
    }

    /// Replace the local name filter. Never touches the network.
    pub async fn set_filter(&self, filter: impl Into<String>) {
        self.state.write().await.filter = filter.into();
    }

    /// Zones matching the current filter.
    pub async fn visible_zones(&self) -> Vec<Zone> {
        let state = self.state.read().await;
        filter_zones(&state.zones, &state.filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Counts over the whole list, regardless of the filter.
    pub async fn summary(&self) -> ZoneSummary {
        ZoneSummary::of(&self.state.read().await.zones)
    }

    pub async fn snapshot(&self) -> ZoneListSnapshot {
        let state = self.state.read().await;
        ZoneListSnapshot {
            phase: state.phase.clone(),
            zones: state.zones.clone(),
            filter: state.filter.clone(),
            creating: state.creating,
        }
    }
}
