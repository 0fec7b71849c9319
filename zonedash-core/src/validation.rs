//! Record draft validation
//!
//! Pure syntactic checks run before a record is submitted. The server stays
//! authoritative; these only catch what is obviously malformed so no request is
//! wasted on it.

use std::net::Ipv4Addr;
use std::sync::LazyLock;

use regex::Regex;
use zonedash_api::{NewRecord, RecordType};

use crate::error::ValidationError;

/// Lowest TTL the dashboard accepts, in seconds.
pub const MIN_TTL: u32 = 3600;

/// Highest MX preference value.
pub const MAX_MX_PRIORITY: u32 = 65535;

/// Dotted quad with every octet in 0..=255. Leading zeros are tolerated.
static IPV4_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    )
    .ok()
});

/// Add-record form as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    pub record_type: RecordType,
    pub name: String,
    pub content: String,
    /// TTL as typed; parsed during validation.
    pub ttl: String,
}

impl Default for RecordDraft {
    fn default() -> Self {
        Self {
            record_type: RecordType::A,
            name: "@".to_string(),
            content: String::new(),
            ttl: MIN_TTL.to_string(),
        }
    }
}

impl RecordDraft {
    pub fn new(
        record_type: RecordType,
        name: impl Into<String>,
        content: impl Into<String>,
        ttl: impl Into<String>,
    ) -> Self {
        Self {
            record_type,
            name: name.into(),
            content: content.into(),
            ttl: ttl.into(),
        }
    }

    /// Reset name and content after a successful submit. Type and TTL are kept
    /// so several records of the same kind can be entered in a row.
    pub fn clear_after_submit(&mut self) {
        self.name = "@".to_string();
        self.content.clear();
    }

    /// Validate this draft. See [`validate_record`].
    pub fn validate(&self) -> Result<NewRecord, ValidationError> {
        validate_record(self)
    }
}

/// Check a draft and turn it into a submittable record.
///
/// Rules, first failure wins:
/// 1. name and content non-empty after trimming
/// 2. type is one the dashboard may create
/// 3. no `*` in the name
/// 4. TTL is a whole number of at least [`MIN_TTL`]
/// 5. type-specific content syntax (A, AAAA, MX)
pub fn validate_record(draft: &RecordDraft) -> Result<NewRecord, ValidationError> {
    let name = draft.name.trim();
    let content = draft.content.trim();

    if name.is_empty() || content.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    if !draft.record_type.is_creatable() {
        return Err(ValidationError::UnsupportedType {
            record_type: draft.record_type,
        });
    }

    if name.contains('*') {
        return Err(ValidationError::Wildcard);
    }

    let ttl = parse_ttl(&draft.ttl)?;

    match draft.record_type {
        RecordType::A if !is_ipv4(content) => return Err(ValidationError::InvalidIpv4),
        RecordType::Aaaa if !content.contains(':') => return Err(ValidationError::InvalidIpv6),
        RecordType::Mx => check_mx(content)?,
        _ => {}
    }

    Ok(NewRecord {
        record_type: draft.record_type,
        name: name.to_string(),
        content: content.to_string(),
        ttl,
    })
}

fn parse_ttl(raw: &str) -> Result<u32, ValidationError> {
    match raw.trim().parse::<u32>() {
        Ok(ttl) if ttl >= MIN_TTL => Ok(ttl),
        _ => Err(ValidationError::TtlTooLow),
    }
}

fn is_ipv4(content: &str) -> bool {
    match IPV4_PATTERN.as_ref() {
        Some(re) => re.is_match(content),
        None => content.parse::<Ipv4Addr>().is_ok(),
    }
}

// "<priority> <host>"; the host is not checked beyond being present
fn check_mx(content: &str) -> Result<(), ValidationError> {
    let parts: Vec<&str> = content.split_whitespace().collect();
    let [priority, _host] = parts.as_slice() else {
        return Err(ValidationError::MxFormat);
    };
    match priority.parse::<u32>() {
        Ok(p) if p <= MAX_MX_PRIORITY => Ok(()),
        _ => Err(ValidationError::MxPriority),
    }
}
