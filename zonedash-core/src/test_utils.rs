//! Test helper module
//!
//! Provides recording mock implementations and convenient test factory methods.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use zonedash_api::{
    ApiError, AuthApi, ChangePasswordRequest, LoginRequest, LookupReport, MessageResponse,
    Navigator, NewRecord, PropagationReport, PublicApi, PublicStats, RecordSet, RecordType,
    RecordValue, ResetPasswordRequest, Result, Route, Session, SignupOtpRequest, TokenResponse,
    User, VerifySignupRequest, Zone, ZoneApi, ZoneStatus,
};

use crate::context::ServiceContext;
use crate::options::ControllerOptions;
use crate::traits::ExportSink;

// ===== Factories =====

pub fn zone(id: &str, name: &str, status: ZoneStatus) -> Zone {
    Zone {
        id: id.to_string(),
        name: name.to_string(),
        status,
        records_count: 0,
        record_limit: zonedash_api::DEFAULT_RECORD_LIMIT,
        created_at: None,
        updated_at: None,
        rrsets: None,
    }
}

pub fn rrset(name: &str, record_type: RecordType, content: &str) -> RecordSet {
    RecordSet {
        name: name.to_string(),
        record_type,
        ttl: 3600,
        records: vec![RecordValue {
            content: content.to_string(),
            disabled: false,
        }],
    }
}

pub fn rejected(status: u16, message: &str) -> ApiError {
    ApiError::Rejected {
        status,
        message: Some(message.to_string()),
        current: None,
    }
}

pub fn network_down() -> ApiError {
    ApiError::NetworkError {
        detail: "connection refused".to_string(),
    }
}

/// Let spawned tasks run without moving the paused clock.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

// ===== MockZoneApi =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneCall {
    ListZones,
    CreateZone(String),
    DeleteZone(String),
    GetZone { id: String, rrsets: bool },
    SearchRecords { id: String, query: String, max: u32 },
    AddRecord { id: String, record: NewRecord },
    DeleteRecord { id: String, name: String, record_type: RecordType },
    VerifyZone(String),
    ExportZone(String),
}

pub struct MockZoneApi {
    calls: Mutex<Vec<ZoneCall>>,
    zones: Mutex<Vec<Zone>>,
    records: Mutex<Vec<RecordSet>>,
    /// Keyed by operation name (`"list_zones"`, `"add_record"`, ...)
    failures: Mutex<HashMap<&'static str, ApiError>>,
    delay: Mutex<Duration>,
    next_id: Mutex<u32>,
}

impl MockZoneApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            zones: Mutex::new(Vec::new()),
            records: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            delay: Mutex::new(Duration::ZERO),
            next_id: Mutex::new(100),
        }
    }

    pub fn with_zones(self, zones: Vec<Zone>) -> Self {
        *lock(&self.zones) = zones;
        self
    }

    pub fn with_records(self, records: Vec<RecordSet>) -> Self {
        *lock(&self.records) = records;
        self
    }

    /// Make `op` fail with `err` until cleared.
    pub fn fail(&self, op: &'static str, err: ApiError) {
        lock(&self.failures).insert(op, err);
    }

    pub fn clear_failure(&self, op: &'static str) {
        lock(&self.failures).remove(op);
    }

    /// Every call sleeps this long before answering.
    pub fn set_delay(&self, delay: Duration) {
        *lock(&self.delay) = delay;
    }

    pub fn calls(&self) -> Vec<ZoneCall> {
        lock(&self.calls).clone()
    }

    pub fn count(&self, pred: impl Fn(&ZoneCall) -> bool) -> usize {
        lock(&self.calls).iter().filter(|c| pred(c)).count()
    }

    pub fn search_calls(&self) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                ZoneCall::SearchRecords { query, .. } => Some(query.clone()),
                _ => None,
            })
            .collect()
    }

    async fn enter(&self, call: ZoneCall, op: &'static str) -> Result<()> {
        lock(&self.calls).push(call);
        let delay = *lock(&self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match lock(&self.failures).get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        rejected(404, "Zone not found")
    }
}

#[async_trait]
impl ZoneApi for MockZoneApi {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        self.enter(ZoneCall::ListZones, "list_zones").await?;
        Ok(lock(&self.zones).clone())
    }

    async fn create_zone(&self, name: &str) -> Result<Zone> {
        self.enter(ZoneCall::CreateZone(name.to_string()), "create_zone")
            .await?;
        let id = {
            let mut next = lock(&self.next_id);
            *next += 1;
            format!("z{next}")
        };
        let created = zone(&id, name, ZoneStatus::PendingVerification);
        lock(&self.zones).push(created.clone());
        Ok(created)
    }

    async fn delete_zone(&self, zone_id: &str) -> Result<MessageResponse> {
        self.enter(ZoneCall::DeleteZone(zone_id.to_string()), "delete_zone")
            .await?;
        lock(&self.zones).retain(|z| z.id != zone_id);
        Ok(MessageResponse::default())
    }

    async fn get_zone(&self, zone_id: &str, include_rrsets: bool) -> Result<Zone> {
        // Answer with the state at request time; the delay models a slow reply.
        let served = lock(&self.zones).iter().find(|z| z.id == zone_id).cloned();
        self.enter(
            ZoneCall::GetZone {
                id: zone_id.to_string(),
                rrsets: include_rrsets,
            },
            "get_zone",
        )
        .await?;
        let mut found = served.ok_or_else(Self::not_found)?;
        found.records_count = u32::try_from(lock(&self.records).len()).unwrap_or(u32::MAX);
        if include_rrsets {
            found.rrsets = Some(lock(&self.records).clone());
        }
        Ok(found)
    }

    async fn search_records(&self, zone_id: &str, query: &str, max: u32) -> Result<Vec<RecordSet>> {
        self.enter(
            ZoneCall::SearchRecords {
                id: zone_id.to_string(),
                query: query.to_string(),
                max,
            },
            "search_records",
        )
        .await?;
        let needle = query.to_lowercase();
        Ok(lock(&self.records)
            .iter()
            .filter(|set| {
                needle.is_empty()
                    || set.name.to_lowercase().contains(&needle)
                    || set
                        .records
                        .iter()
                        .any(|r| r.content.to_lowercase().contains(&needle))
            })
            .take(max as usize)
            .cloned()
            .collect())
    }

    async fn add_record(&self, zone_id: &str, record: &NewRecord) -> Result<MessageResponse> {
        self.enter(
            ZoneCall::AddRecord {
                id: zone_id.to_string(),
                record: record.clone(),
            },
            "add_record",
        )
        .await?;
        let mut set = rrset(&record.name, record.record_type, &record.content);
        set.ttl = record.ttl;
        lock(&self.records).push(set);
        Ok(MessageResponse::default())
    }

    async fn delete_record(
        &self,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<MessageResponse> {
        self.enter(
            ZoneCall::DeleteRecord {
                id: zone_id.to_string(),
                name: name.to_string(),
                record_type,
            },
            "delete_record",
        )
        .await?;
        lock(&self.records).retain(|s| !(s.name == name && s.record_type == record_type));
        Ok(MessageResponse::default())
    }

    async fn verify_zone(&self, zone_id: &str) -> Result<MessageResponse> {
        self.enter(ZoneCall::VerifyZone(zone_id.to_string()), "verify_zone")
            .await?;
        if let Some(z) = lock(&self.zones).iter_mut().find(|z| z.id == zone_id) {
            z.status = ZoneStatus::Active;
        }
        Ok(MessageResponse {
            message: Some("Zone verified".to_string()),
        })
    }

    async fn export_zone(&self, zone_id: &str) -> Result<Vec<u8>> {
        self.enter(ZoneCall::ExportZone(zone_id.to_string()), "export_zone")
            .await?;
        Ok(format!("; zone {zone_id}\n@ 3600 IN A 192.0.2.1\n").into_bytes())
    }
}

// ===== MockAuthApi =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCall {
    Login(String),
    SendSignupOtp(String),
    VerifySignupOtp(String),
    ForgotPassword(String),
    ResetPassword(String),
    SendPasswordOtp,
    ChangePassword,
    Me,
}

pub struct MockAuthApi {
    calls: Mutex<Vec<AuthCall>>,
    failures: Mutex<HashMap<&'static str, ApiError>>,
    token: String,
}

impl MockAuthApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            token: "issued-token-0123456789".to_string(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn fail(&self, op: &'static str, err: ApiError) {
        lock(&self.failures).insert(op, err);
    }

    pub fn calls(&self) -> Vec<AuthCall> {
        lock(&self.calls).clone()
    }

    fn enter(&self, call: AuthCall, op: &'static str) -> Result<()> {
        lock(&self.calls).push(call);
        match lock(&self.failures).get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn ack() -> MessageResponse {
        MessageResponse {
            message: Some("OK".to_string()),
        }
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn login(&self, req: &LoginRequest) -> Result<TokenResponse> {
        self.enter(AuthCall::Login(req.email.clone()), "login")?;
        Ok(TokenResponse {
            token: self.token.clone(),
        })
    }

    async fn send_signup_otp(&self, req: &SignupOtpRequest) -> Result<MessageResponse> {
        self.enter(AuthCall::SendSignupOtp(req.email.clone()), "send_signup_otp")?;
        Ok(Self::ack())
    }

    async fn verify_signup_otp(&self, req: &VerifySignupRequest) -> Result<TokenResponse> {
        self.enter(AuthCall::VerifySignupOtp(req.otp.clone()), "verify_signup_otp")?;
        Ok(TokenResponse {
            token: self.token.clone(),
        })
    }

    async fn forgot_password(&self, email: &str) -> Result<MessageResponse> {
        self.enter(AuthCall::ForgotPassword(email.to_string()), "forgot_password")?;
        Ok(Self::ack())
    }

    async fn reset_password(&self, req: &ResetPasswordRequest) -> Result<MessageResponse> {
        self.enter(AuthCall::ResetPassword(req.email.clone()), "reset_password")?;
        Ok(Self::ack())
    }

    async fn send_password_otp(&self) -> Result<MessageResponse> {
        self.enter(AuthCall::SendPasswordOtp, "send_password_otp")?;
        Ok(Self::ack())
    }

    async fn change_password(&self, _req: &ChangePasswordRequest) -> Result<MessageResponse> {
        self.enter(AuthCall::ChangePassword, "change_password")?;
        Ok(Self::ack())
    }

    async fn me(&self) -> Result<User> {
        self.enter(AuthCall::Me, "me")?;
        Ok(User {
            id: "u1".to_string(),
            name: Some("Ada".to_string()),
            email: "ada@example.com".to_string(),
            github_id: None,
            created_at: None,
        })
    }

    fn github_login_url(&self) -> String {
        "http://localhost:5001/api/auth/github".to_string()
    }
}

// ===== MockPublicApi =====

pub struct MockPublicApi {
    stats: Mutex<PublicStats>,
    lookups: Mutex<Vec<(String, String)>>,
    failures: Mutex<HashMap<&'static str, ApiError>>,
}

impl MockPublicApi {
    pub fn new() -> Self {
        Self {
            stats: Mutex::new(PublicStats::default()),
            lookups: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_stats(&self, stats: PublicStats) {
        *lock(&self.stats) = stats;
    }

    pub fn fail(&self, op: &'static str, err: ApiError) {
        lock(&self.failures).insert(op, err);
    }

    pub fn clear_failure(&self, op: &'static str) {
        lock(&self.failures).remove(op);
    }

    pub fn lookups(&self) -> Vec<(String, String)> {
        lock(&self.lookups).clone()
    }

    fn check(&self, op: &'static str) -> Result<()> {
        match lock(&self.failures).get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PublicApi for MockPublicApi {
    async fn public_stats(&self) -> Result<PublicStats> {
        self.check("public_stats")?;
        Ok(lock(&self.stats).clone())
    }

    async fn dns_lookup(&self, domain: &str, record_type: &str) -> Result<LookupReport> {
        lock(&self.lookups).push((domain.to_string(), record_type.to_string()));
        self.check("dns_lookup")?;
        Ok(LookupReport {
            domain: domain.to_string(),
            record_type: record_type.to_string(),
            results: std::collections::BTreeMap::new(),
        })
    }

    async fn dns_propagation(&self, domain: &str) -> Result<PropagationReport> {
        lock(&self.lookups).push((domain.to_string(), "propagation".to_string()));
        self.check("dns_propagation")?;
        Ok(PropagationReport {
            domain: domain.to_string(),
            ..PropagationReport::default()
        })
    }
}

// ===== RecordingNavigator =====

pub struct RecordingNavigator {
    current: Mutex<String>,
    history: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn at(route: &Route) -> Self {
        Self {
            current: Mutex::new(route.path()),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn history(&self) -> Vec<Route> {
        lock(&self.history).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        lock(&self.current).clone()
    }

    fn navigate(&self, route: Route) {
        *lock(&self.current) = route.path();
        lock(&self.history).push(route);
    }
}

// ===== RecordingExportSink =====

pub struct RecordingExportSink {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
    fail: Mutex<bool>,
}

impl RecordingExportSink {
    pub fn new() -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
            fail: Mutex::new(false),
        }
    }

    pub fn set_failing(&self, fail: bool) {
        *lock(&self.fail) = fail;
    }

    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        lock(&self.saved).clone()
    }
}

impl ExportSink for RecordingExportSink {
    fn save(&self, file_name: &str, contents: &[u8]) -> std::io::Result<String> {
        if *lock(&self.fail) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only directory",
            ));
        }
        lock(&self.saved).push((file_name.to_string(), contents.to_vec()));
        Ok(format!("/tmp/{file_name}"))
    }
}

// ===== Harness =====

/// Every mock wired into one [`ServiceContext`].
pub struct Harness {
    pub ctx: Arc<ServiceContext>,
    pub zones: Arc<MockZoneApi>,
    pub auth: Arc<MockAuthApi>,
    pub public: Arc<MockPublicApi>,
    pub navigator: Arc<RecordingNavigator>,
    pub exports: Arc<RecordingExportSink>,
}

impl Harness {
    pub fn new(zones: MockZoneApi) -> Self {
        Self::at(zones, &Route::Dashboard)
    }

    pub fn at(zones: MockZoneApi, route: &Route) -> Self {
        let zones = Arc::new(zones);
        let auth = Arc::new(MockAuthApi::new());
        let public = Arc::new(MockPublicApi::new());
        let navigator = Arc::new(RecordingNavigator::at(route));
        let exports = Arc::new(RecordingExportSink::new());
        let options = ControllerOptions::default();
        let ctx = Arc::new(ServiceContext {
            zone_api: zones.clone(),
            auth_api: auth.clone(),
            public_api: public.clone(),
            session: Session::in_memory(),
            navigator: navigator.clone(),
            notifier: crate::notify::Notifier::new(options.toast_duration),
            exports: exports.clone(),
            options,
        });
        Self {
            ctx,
            zones,
            auth,
            public,
            navigator,
            exports,
        }
    }

    /// Messages currently in the toast queue, in order.
    pub fn toast_messages(&self) -> Vec<String> {
        self.ctx
            .notifier
            .toasts()
            .into_iter()
            .map(|t| t.message)
            .collect()
    }
}
