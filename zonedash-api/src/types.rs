use serde::{Deserialize, Serialize};

// ============ Zone Types ============

/// Default cap on records per zone when the server does not report one.
pub const DEFAULT_RECORD_LIMIT: u32 = 200;

/// Lifecycle status of a hosted zone.
///
/// The backend has reported both `pending` and `pending_verification` for a zone
/// whose delegation has not been verified yet; both map to
/// [`PendingVerification`](Self::PendingVerification). Any other status is kept
/// verbatim in [`Other`](Self::Other) and treated as not active.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ZoneStatus {
    /// Nameserver delegation not yet verified. Records cannot be changed.
    PendingVerification,
    /// Delegation verified; the zone is served.
    Active,
    /// A status this client does not model (e.g. `suspended`).
    Other(String),
}

impl ZoneStatus {
    /// Whether record mutations are allowed in this status.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Short label for display.
    pub fn label(&self) -> &str {
        match self {
            Self::PendingVerification => "Pending",
            Self::Active => "Active",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for ZoneStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" | "pending_verification" => Self::PendingVerification,
            "active" => Self::Active,
            _ => Self::Other(raw),
        }
    }
}

impl From<ZoneStatus> for String {
    fn from(status: ZoneStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for ZoneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PendingVerification => write!(f, "pending_verification"),
            Self::Active => write!(f, "active"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// A DNS zone hosted for the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Server-assigned identifier.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Fully-qualified zone name (e.g., `"example.com"`).
    pub name: String,
    /// Current lifecycle status.
    pub status: ZoneStatus,
    /// Server-reported record count. Advisory; may lag the record list.
    #[serde(rename = "records_count", alias = "recordsCount", default)]
    pub records_count: u32,
    /// Maximum number of records allowed in this zone.
    #[serde(rename = "recordLimit", alias = "record_limit", default = "default_record_limit")]
    pub record_limit: u32,
    /// When the zone was created.
    #[serde(rename = "createdAt", default, with = "crate::utils::datetime")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    /// When the zone was last updated.
    #[serde(rename = "updatedAt", default, with = "crate::utils::datetime")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Record sets, present only when requested with `rrsets=true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rrsets: Option<Vec<RecordSet>>,
}

fn default_record_limit() -> u32 {
    DEFAULT_RECORD_LIMIT
}

impl Zone {
    /// Whether the zone has reached its record cap.
    pub fn at_record_limit(&self) -> bool {
        self.records_count >= self.record_limit
    }
}

/// Body of `POST /zones`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateZoneRequest {
    /// Zone name to create.
    pub name: String,
}

// ============ Record Types ============

/// DNS record type.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Text record.
    Txt,
    /// Name server record. Server-managed at the apex.
    Ns,
    /// Start of authority record. Server-managed.
    Soa,
}

impl RecordType {
    /// Types a user may create from the dashboard.
    pub const CREATABLE: [Self; 5] = [Self::A, Self::Aaaa, Self::Cname, Self::Txt, Self::Mx];

    /// Wire / display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Soa => "SOA",
        }
    }

    /// Whether the dashboard may create records of this type.
    pub fn is_creatable(self) -> bool {
        Self::CREATABLE.contains(&self)
    }

    /// NS and SOA sets belong to the server and are never deleted by the client.
    pub fn is_server_managed(self) -> bool {
        matches!(self, Self::Ns | Self::Soa)
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "CNAME" => Ok(Self::Cname),
            "MX" => Ok(Self::Mx),
            "TXT" => Ok(Self::Txt),
            "NS" => Ok(Self::Ns),
            "SOA" => Ok(Self::Soa),
            other => Err(format!("Unsupported record type: {other}")),
        }
    }
}

/// One value inside a record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordValue {
    /// Type-specific payload (address, target, text, `"<priority> <host>"`).
    pub content: String,
    /// Whether the value is disabled on the server.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

/// All values sharing one owner name and type.
///
/// `(name, record_type)` is the identity of a set within a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Owner name; `"@"` or the zone apex denotes the apex.
    pub name: String,
    /// Record type shared by every value.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// TTL in seconds, shared by every value.
    pub ttl: u32,
    /// Values in server order.
    #[serde(default)]
    pub records: Vec<RecordValue>,
}

impl RecordSet {
    /// Identity key of this set.
    pub fn key(&self) -> RecordKey {
        RecordKey {
            name: self.name.clone(),
            record_type: self.record_type,
        }
    }

    /// Whether the dashboard offers a delete action for this set.
    pub fn is_deletable(&self) -> bool {
        !self.record_type.is_server_managed()
    }
}

/// Identity of a record set: owner name plus type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    /// Owner name as returned by the server.
    pub name: String,
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: RecordType,
}

impl RecordKey {
    pub fn new(name: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            record_type,
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.name, self.record_type)
    }
}

/// Body of `POST /zones/:id/records`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Owner name relative to the apex.
    pub name: String,
    /// Type-specific payload.
    pub content: String,
    /// TTL in seconds.
    pub ttl: u32,
}

/// Body of `DELETE /zones/:id/records`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRecordRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
}

/// Query of `GET /zones/:id/records`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordQuery {
    /// Free-text filter; empty matches everything.
    pub q: String,
    /// Maximum number of sets returned.
    pub max: u32,
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human readable confirmation, if the server sent one.
    #[serde(default)]
    pub message: Option<String>,
}

// ============ Auth Types ============

/// Token issued by login, signup verification and the OAuth callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer token.
    pub token: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/send-otp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupOtpRequest {
    pub email: String,
    pub name: String,
}

/// Body of `POST /auth/verify-otp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifySignupRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub otp: String,
}

/// Body of `POST /auth/forgot-password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Body of `POST /auth/reset-password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

/// Body of `POST /auth/change-password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub otp: String,
}

/// Identity of the signed-in user (`GET /auth/me`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    /// Set when the account was linked with GitHub.
    #[serde(rename = "githubId", default, skip_serializing_if = "Option::is_none")]
    pub github_id: Option<String>,
    #[serde(rename = "createdAt", default, with = "crate::utils::datetime")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

// ============ Public Types ============

/// Aggregate counters of `GET /public/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublicStats {
    pub total_queries: u64,
    pub total_zones: u64,
    pub total_records: u64,
    /// Seconds since the name servers started.
    pub uptime: u64,
    /// Average answer latency in microseconds.
    pub avg_latency: f64,
    pub udp_answers: u64,
    pub tcp_answers: u64,
}

/// Answer of one public resolver in a DNS lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverAnswer {
    /// Resolver operator (e.g., `"Google"`).
    pub provider: String,
    /// Resolver addresses queried.
    pub servers: Vec<String>,
    /// Whether the resolver answered.
    pub success: bool,
    /// Answer payload as returned (list of strings or a structured object).
    pub records: serde_json::Value,
    /// Resolver-side error, if any.
    pub error: Option<String>,
}

/// Result of `GET /dns-checker/check/:domain/:type`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LookupReport {
    pub domain: String,
    pub record_type: String,
    pub results: std::collections::BTreeMap<String, ResolverAnswer>,
}

/// One resolver's view of the zone's delegation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DelegationCheck {
    pub provider: String,
    /// Whether the resolver already returns the hosting nameservers.
    #[serde(rename = "hasStackryzeNS", alias = "hasExpectedNs")]
    pub has_expected_ns: bool,
    /// Nameservers the resolver currently returns.
    #[serde(rename = "currentNS", alias = "currentNs")]
    pub current_ns: Vec<String>,
    pub error: Option<String>,
}

/// Valid/total counters of a propagation check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationSummary {
    pub valid: u32,
    pub total: u32,
}

/// Result of `GET /dns-checker/propagation/:domain`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropagationReport {
    pub domain: String,
    pub propagated: bool,
    pub propagation_percentage: f64,
    pub summary: PropagationSummary,
    pub details: std::collections::BTreeMap<String, DelegationCheck>,
}
