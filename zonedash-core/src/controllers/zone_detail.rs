//! Single zone view: metadata, record search, record and zone actions.
//!
//! Metadata and records load independently so a large zone never blocks the
//! header. Every action tracks its own in-flight flag; record deletions are
//! tracked per `(name, type)` so unrelated rows stay usable.

use std::collections::HashSet;
use std::sync::{Arc, Weak};

use futures::future::join;
use tokio::sync::RwLock;
use zonedash_api::{ApiError, RecordKey, RecordSet, Route, Zone};

use crate::context::ServiceContext;
use crate::controllers::LoadPhase;
use crate::debounce::Debouncer;
use crate::error::Outcome;
use crate::notify::{ConfirmDialog, ConfirmRequest};
use crate::validation::RecordDraft;

/// Nameservers a zone must delegate to before it is verified.
pub const EXPECTED_NAMESERVERS: [&str; 2] = ["ns1.stackryze.com", "ns2.stackryze.com"];

/// Shown when zone metadata cannot be fetched.
pub const METADATA_FAILED: &str = "Failed to fetch zone details";

/// Refusal while the zone awaits verification.
pub const ZONE_LOCKED: &str = "Verify the zone's nameservers before changing records";

/// Destructive action waiting behind the confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteRecord(RecordKey),
    DeleteZone,
}

/// Why the last verification attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationFailure {
    pub message: String,
    /// Nameservers the server currently sees for the zone, when it reported them.
    pub current_nameservers: Option<Vec<String>>,
}

/// Record count against the zone's cap, from metadata (may lag the record list).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordUsage {
    pub count: u32,
    pub limit: u32,
    pub limit_reached: bool,
}

/// In-flight markers. Each action has its own so none blocks another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InFlight {
    pub loading_metadata: bool,
    pub searching: bool,
    pub verifying: bool,
    pub adding: bool,
    pub deleting_zone: bool,
    pub exporting: bool,
    pub deleting_records: HashSet<RecordKey>,
}

/// Point-in-time copy of the detail state.
#[derive(Debug, Clone)]
pub struct ZoneDetailSnapshot {
    pub zone_id: String,
    pub zone: Option<Zone>,
    pub metadata: LoadPhase,
    pub records: Vec<RecordSet>,
    pub records_error: Option<String>,
    pub query: String,
    pub add_mode: bool,
    pub form: RecordDraft,
    pub verification_failure: Option<VerificationFailure>,
    pub pending_confirmation: Option<ConfirmRequest<PendingAction>>,
    pub in_flight: InFlight,
    pub locked: bool,
}

impl ZoneDetailSnapshot {
    /// Whether a delete control is offered for `set`.
    pub fn can_delete(&self, set: &RecordSet) -> bool {
        !self.locked && set.is_deletable() && !self.in_flight.deleting_records.contains(&set.key())
    }
}

#[derive(Debug, Default)]
struct DetailState {
    zone: Option<Zone>,
    metadata: LoadPhase,
    records: Vec<RecordSet>,
    records_error: Option<String>,
    query: String,
    add_mode: bool,
    form: RecordDraft,
    verification_failure: Option<VerificationFailure>,
    dialog: ConfirmDialog<PendingAction>,
    in_flight: InFlight,
    /// Id of the newest record search; older answers are dropped.
    search_generation: u64,
    /// Id of the newest metadata fetch.
    metadata_generation: u64,
    torn_down: bool,
}

impl DetailState {
    fn is_locked(&self) -> bool {
        self.zone.as_ref().is_none_or(|z| !z.status.is_active())
    }
}

struct Inner {
    zone_id: String,
    ctx: Arc<ServiceContext>,
    state: RwLock<DetailState>,
    search_debounce: Debouncer,
}

/// Zone detail controller
///
/// Cheap to clone; clones drive the same view. Call [`teardown`](Self::teardown)
/// when the view goes away: pending searches are cancelled and answers still
/// in flight are ignored.
#[derive(Clone)]
pub struct ZoneDetailController {
    inner: Arc<Inner>,
}

impl ZoneDetailController {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, zone_id: impl Into<String>) -> Self {
        let search_debounce = Debouncer::new(ctx.options.search_debounce);
        Self {
            inner: Arc::new(Inner {
                zone_id: zone_id.into(),
                ctx,
                state: RwLock::new(DetailState::default()),
                search_debounce,
            }),
        }
    }

    fn downgrade(&self) -> Weak<Inner> {
        Arc::downgrade(&self.inner)
    }

    pub fn zone_id(&self) -> &str {
        &self.inner.zone_id
    }

    // ============ Loading ============

    /// Initial load: metadata and the unfiltered record search, in parallel.
    ///
    /// Returns the metadata outcome; record failures only mark the record region.
    pub async fn mount(&self) -> Outcome {
        let (metadata, _) = join(self.refresh_metadata(), self.search(String::new())).await;
        metadata
    }

    /// Fetch zone metadata without record sets.
    ///
    /// Returns [`Outcome::Busy`] while another metadata fetch is running.
    pub async fn refresh_metadata(&self) -> Outcome {
        self.fetch_metadata(false).await
    }

    /// With `supersede`, start even if a fetch is running; the older answer is
    /// then dropped so it cannot overwrite newer server state.
    async fn fetch_metadata(&self, supersede: bool) -> Outcome {
        let generation = {
            let mut state = self.inner.state.write().await;
            if state.torn_down {
                return Outcome::Discarded;
            }
            if state.in_flight.loading_metadata && !supersede {
                return Outcome::Busy;
            }
            state.in_flight.loading_metadata = true;
            if state.zone.is_none() {
                state.metadata = LoadPhase::Loading;
            }
            state.metadata_generation += 1;
            state.metadata_generation
        };

        let result = self.inner.ctx.zone_api.get_zone(&self.inner.zone_id, false).await;

        let mut state = self.inner.state.write().await;
        if state.metadata_generation != generation {
            log::debug!("Dropping stale metadata for zone {}", self.inner.zone_id);
            return Outcome::Discarded;
        }
        state.in_flight.loading_metadata = false;
        if state.torn_down {
            return Outcome::Discarded;
        }
        match result {
            Ok(zone) => {
                state.zone = Some(zone);
                state.metadata = LoadPhase::Loaded;
                Outcome::Succeeded
            }
            Err(e) => {
                log_failure("fetch zone metadata", &e);
                state.metadata = LoadPhase::Errored(METADATA_FAILED.to_string());
                Outcome::Failed(METADATA_FAILED.to_string())
            }
        }
    }

    /// Re-run the current search right away.
    pub async fn refresh_records(&self) -> Outcome {
        let query = self.inner.state.read().await.query.clone();
        self.search(query).await
    }

    /// Record the typed query and schedule a search once typing pauses.
    ///
    /// Each call cancels the previously scheduled search.
    pub async fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        {
            let mut state = self.inner.state.write().await;
            if state.torn_down {
                return;
            }
            state.query.clone_from(&query);
        }

        let weak = self.downgrade();
        self.inner.search_debounce.schedule(async move {
            if let Some(inner) = weak.upgrade() {
                ZoneDetailController { inner }.search(query).await;
            }
        });
    }

    /// Search for `query` immediately, dropping any scheduled search.
    pub async fn search_now(&self, query: impl Into<String>) -> Outcome {
        let query = query.into();
        self.inner.search_debounce.cancel();
        self.inner.state.write().await.query.clone_from(&query);
        self.search(query).await
    }

    async fn search(&self, query: String) -> Outcome {
        let generation = {
            let mut state = self.inner.state.write().await;
            if state.torn_down {
                return Outcome::Discarded;
            }
            state.search_generation += 1;
            state.in_flight.searching = true;
            state.search_generation
        };

        let max = self.inner.ctx.options.max_records;
        let result = self
            .inner
            .ctx
            .zone_api
            .search_records(&self.inner.zone_id, &query, max)
            .await;

        let mut state = self.inner.state.write().await;
        if state.torn_down || state.search_generation != generation {
            log::debug!("Dropping stale record search for '{query}'");
            return Outcome::Discarded;
        }
        state.in_flight.searching = false;
        match result {
            Ok(records) => {
                state.records = records;
                state.records_error = None;
                Outcome::Succeeded
            }
            Err(e) => {
                log_failure("fetch records", &e);
                let reason = e.reason();
                state.records_error = Some(reason.clone());
                Outcome::Failed(reason)
            }
        }
    }

    // ============ Add record ============

    /// Open the add-record form. Refused while the zone is locked.
    pub async fn start_add(&self) -> Outcome {
        let mut state = self.inner.state.write().await;
        if state.is_locked() {
            drop(state);
            return self.refuse_locked();
        }
        state.add_mode = true;
        Outcome::Succeeded
    }

    /// Close the add-record form, keeping what was typed.
    pub async fn cancel_add(&self) {
        self.inner.state.write().await.add_mode = false;
    }

    /// Edit the add-record form in place.
    pub async fn update_form(&self, edit: impl FnOnce(&mut RecordDraft)) {
        edit(&mut self.inner.state.write().await.form);
    }

    pub async fn form(&self) -> RecordDraft {
        self.inner.state.read().await.form.clone()
    }

    /// Validate and submit the form.
    ///
    /// Nothing is sent unless validation passes. On success the form resets,
    /// add mode closes and the current search is re-run; on failure the form is
    /// kept for correction.
    pub async fn add_record(&self) -> Outcome {
        let notifier = &self.inner.ctx.notifier;
        let record = {
            let mut state = self.inner.state.write().await;
            if state.torn_down {
                return Outcome::Discarded;
            }
            if state.is_locked() {
                drop(state);
                return self.refuse_locked();
            }
            if state.in_flight.adding {
                return Outcome::Busy;
            }
            match state.form.validate() {
                Ok(record) => {
                    state.in_flight.adding = true;
                    record
                }
                Err(invalid) => {
                    let msg = invalid.to_string();
                    if invalid.is_warning() {
                        notifier.warning(msg.clone());
                    } else {
                        notifier.error(msg.clone());
                    }
                    return Outcome::Rejected(msg);
                }
            }
        };

        let result = self
            .inner
            .ctx
            .zone_api
            .add_record(&self.inner.zone_id, &record)
            .await;

        {
            let mut state = self.inner.state.write().await;
            state.in_flight.adding = false;
            if state.torn_down {
                return Outcome::Discarded;
            }
            if let Err(e) = result {
                drop(state);
                log_failure("add record", &e);
                let reason = e.reason();
                notifier.error(format!("Failed to add record: {reason}"));
                return Outcome::Failed(reason);
            }
            state.form.clear_after_submit();
            state.add_mode = false;
        }

        log::info!(
            "Added {} record '{}' to zone {}",
            record.record_type,
            record.name,
            self.inner.zone_id
        );
        notifier.success(format!("{} record added successfully", record.record_type));
        self.refresh_records().await;
        Outcome::Succeeded
    }

    /// Replace the form with `draft` and submit it.
    pub async fn submit_record(&self, draft: RecordDraft) -> Outcome {
        self.inner.state.write().await.form = draft;
        self.add_record().await
    }

    // ============ Confirmation-gated actions ============

    /// Ask for confirmation before deleting a record set.
    ///
    /// Returns whether the dialog opened. NS and SOA sets are never offered.
    pub async fn request_delete_record(&self, key: RecordKey) -> bool {
        let mut state = self.inner.state.write().await;
        if state.is_locked() {
            drop(state);
            self.refuse_locked();
            return false;
        }
        if key.record_type.is_server_managed() {
            drop(state);
            self.inner.ctx.notifier.warning(format!(
                "{} records are managed by the server and cannot be deleted",
                key.record_type
            ));
            return false;
        }
        let message = format!(
            "Are you sure you want to delete this {} record?",
            key.record_type
        );
        state.dialog.open(ConfirmRequest::new(
            "Delete Record",
            message,
            PendingAction::DeleteRecord(key),
        ));
        true
    }

    /// Ask for confirmation before deleting the whole zone.
    ///
    /// Needs the zone metadata for its name; returns whether the dialog opened.
    pub async fn request_delete_zone(&self) -> bool {
        let mut state = self.inner.state.write().await;
        let Some(name) = state.zone.as_ref().map(|z| z.name.clone()) else {
            return false;
        };
        let message = format!(
            "Are you absolutely sure you want to delete \"{name}\"? This action cannot be undone and will permanently delete all DNS records."
        );
        state.dialog.open(
            ConfirmRequest::new("Delete Zone", message, PendingAction::DeleteZone)
                .with_confirm_label("Delete Zone"),
        );
        true
    }

    /// The confirmation currently awaiting an answer.
    pub async fn pending_confirmation(&self) -> Option<ConfirmRequest<PendingAction>> {
        self.inner.state.read().await.dialog.current().cloned()
    }

    /// Close the dialog without acting. Returns whether one was open.
    pub async fn cancel_confirmation(&self) -> bool {
        self.inner.state.write().await.dialog.cancel()
    }

    /// Close the dialog and run the action it was guarding.
    pub async fn confirm(&self) -> Outcome {
        let action = self.inner.state.write().await.dialog.confirm();
        match action {
            Some(PendingAction::DeleteRecord(key)) => self.delete_record(key).await,
            Some(PendingAction::DeleteZone) => self.delete_zone().await,
            None => Outcome::Rejected("Nothing to confirm".to_string()),
        }
    }

    async fn delete_record(&self, key: RecordKey) -> Outcome {
        {
            let mut state = self.inner.state.write().await;
            if state.is_locked() {
                drop(state);
                return self.refuse_locked();
            }
            if !state.in_flight.deleting_records.insert(key.clone()) {
                return Outcome::Busy;
            }
        }

        let result = self
            .inner
            .ctx
            .zone_api
            .delete_record(&self.inner.zone_id, &key.name, key.record_type)
            .await;

        {
            let mut state = self.inner.state.write().await;
            state.in_flight.deleting_records.remove(&key);
            if state.torn_down {
                return Outcome::Discarded;
            }
        }

        let notifier = &self.inner.ctx.notifier;
        match result {
            Ok(_) => {
                log::info!("Deleted record set {key} from zone {}", self.inner.zone_id);
                notifier.success(format!("{} record deleted successfully", key.record_type));
                self.refresh_records().await;
                Outcome::Succeeded
            }
            Err(e) => {
                log_failure("delete record", &e);
                let reason = e.reason();
                notifier.error(format!("Failed to delete record: {reason}"));
                Outcome::Failed(reason)
            }
        }
    }

    async fn delete_zone(&self) -> Outcome {
        {
            let mut state = self.inner.state.write().await;
            if state.in_flight.deleting_zone {
                return Outcome::Busy;
            }
            state.in_flight.deleting_zone = true;
        }

        let result = self.inner.ctx.zone_api.delete_zone(&self.inner.zone_id).await;

        let torn_down = {
            let mut state = self.inner.state.write().await;
            state.in_flight.deleting_zone = false;
            state.torn_down
        };
        if torn_down {
            return Outcome::Discarded;
        }

        let notifier = &self.inner.ctx.notifier;
        match result {
            Ok(_) => {
                log::info!("Deleted zone {}", self.inner.zone_id);
                notifier.success("Zone deleted successfully");
                self.teardown().await;
                self.inner.ctx.navigator.navigate(Route::Dashboard);
                Outcome::Succeeded
            }
            Err(e) => {
                log_failure("delete zone", &e);
                let reason = e.reason();
                notifier.error(format!("Failed to delete zone: {reason}"));
                Outcome::Failed(reason)
            }
        }
    }

    // ============ Verify / export ============

    /// Ask the server to check delegation. On success metadata is re-fetched to
    /// pick up the new status.
    pub async fn verify_zone(&self) -> Outcome {
        {
            let mut state = self.inner.state.write().await;
            if state.in_flight.verifying {
                return Outcome::Busy;
            }
            state.in_flight.verifying = true;
            state.verification_failure = None;
        }

        let result = self.inner.ctx.zone_api.verify_zone(&self.inner.zone_id).await;

        {
            let mut state = self.inner.state.write().await;
            state.in_flight.verifying = false;
            if state.torn_down {
                return Outcome::Discarded;
            }
            if let Err(e) = &result {
                log_failure("verify zone", e);
                let reason = e.reason();
                state.verification_failure = Some(VerificationFailure {
                    message: reason.clone(),
                    current_nameservers: e.current_nameservers().map(<[String]>::to_vec),
                });
                return Outcome::Failed(reason);
            }
        }

        self.inner.ctx.notifier.success("Zone verified successfully!");
        // A fetch already in flight may predate the verification.
        self.fetch_metadata(true).await;
        Outcome::Succeeded
    }

    /// Download the zone file and hand it to the export sink as `<name>.zone`.
    pub async fn export_zone(&self) -> Outcome {
        let name = {
            let mut state = self.inner.state.write().await;
            let Some(name) = state.zone.as_ref().map(|z| z.name.clone()) else {
                return Outcome::Rejected("Zone details are not loaded yet".to_string());
            };
            if state.in_flight.exporting {
                return Outcome::Busy;
            }
            state.in_flight.exporting = true;
            name
        };

        let result = self.inner.ctx.zone_api.export_zone(&self.inner.zone_id).await;

        {
            let mut state = self.inner.state.write().await;
            state.in_flight.exporting = false;
            if state.torn_down {
                return Outcome::Discarded;
            }
        }

        let notifier = &self.inner.ctx.notifier;
        let bytes = match result {
            Ok(bytes) => bytes,
            Err(e) => {
                log_failure("export zone", &e);
                let reason = e.reason();
                notifier.error(format!("Failed to export zone: {reason}"));
                return Outcome::Failed(reason);
            }
        };

        match self.inner.ctx.exports.save(&format!("{name}.zone"), &bytes) {
            Ok(location) => {
                log::info!("Exported zone {name} to {location}");
                notifier.success(format!("Zone {name} exported successfully!"));
                Outcome::Succeeded
            }
            Err(e) => {
                log::error!("Failed to save zone file for {name}: {e}");
                let reason = e.to_string();
                notifier.error(format!("Failed to export zone: {reason}"));
                Outcome::Failed(reason)
            }
        }
    }

    // ============ View state ============

    /// Leave the view: cancel the scheduled search, close the dialog and ignore
    /// every answer still in flight.
    pub async fn teardown(&self) {
        self.inner.search_debounce.cancel();
        let mut state = self.inner.state.write().await;
        state.torn_down = true;
        state.dialog.cancel();
    }

    /// Whether record changes are refused (zone not active, or not loaded yet).
    pub async fn is_locked(&self) -> bool {
        self.inner.state.read().await.is_locked()
    }

    pub async fn is_deleting(&self, key: &RecordKey) -> bool {
        self.inner
            .state
            .read()
            .await
            .in_flight
            .deleting_records
            .contains(key)
    }

    pub async fn record_usage(&self) -> Option<RecordUsage> {
        self.inner.state.read().await.zone.as_ref().map(|z| RecordUsage {
            count: z.records_count,
            limit: z.record_limit,
            limit_reached: z.at_record_limit(),
        })
    }

    pub async fn snapshot(&self) -> ZoneDetailSnapshot {
        let state = self.inner.state.read().await;
        ZoneDetailSnapshot {
            zone_id: self.inner.zone_id.clone(),
            zone: state.zone.clone(),
            metadata: state.metadata.clone(),
            records: state.records.clone(),
            records_error: state.records_error.clone(),
            query: state.query.clone(),
            add_mode: state.add_mode,
            form: state.form.clone(),
            verification_failure: state.verification_failure.clone(),
            pending_confirmation: state.dialog.current().cloned(),
            in_flight: state.in_flight.clone(),
            locked: state.is_locked(),
        }
    }

    fn refuse_locked(&self) -> Outcome {
        self.inner.ctx.notifier.warning(ZONE_LOCKED);
        Outcome::Rejected(ZONE_LOCKED.to_string())
    }
}

impl std::fmt::Debug for ZoneDetailController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneDetailController")
            .field("zone_id", &self.inner.zone_id)
            .finish_non_exhaustive()
    }
}

fn log_failure(action: &str, e: &ApiError) {
    if e.is_expected() {
        log::warn!("Failed to {action}: {e}");
    } else {
        log::error!("Failed to {action}: {e}");
    }
}
