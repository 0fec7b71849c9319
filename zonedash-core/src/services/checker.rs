//! Public DNS checker: resolver lookups and delegation propagation.
//!
//! Both calls work without a session. Resolution happens on the server; this
//! only validates input and names failures.

use std::sync::Arc;

use zonedash_api::{LookupReport, PropagationReport};

use crate::context::ServiceContext;
use crate::error::{CoreError, CoreResult};

/// Record types the checker can query.
pub const LOOKUP_TYPES: [&str; 11] = [
    "A", "AAAA", "CNAME", "MX", "TXT", "NS", "SOA", "SRV", "CAA", "PTR", "NAPTR",
];

pub const DEFAULT_LOOKUP_TYPE: &str = "NS";

pub const DOMAIN_REQUIRED: &str = "Please enter a domain";

pub struct DnsChecker {
    ctx: Arc<ServiceContext>,
}

impl DnsChecker {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Ask the server's resolvers for `record_type` records of `domain`.
    pub async fn lookup(&self, domain: &str, record_type: &str) -> CoreResult<LookupReport> {
        let domain = normalize_domain(domain)?;
        let record_type = record_type.trim().to_ascii_uppercase();
        if !LOOKUP_TYPES.contains(&record_type.as_str()) {
            return Err(CoreError::InvalidInput(format!(
                "Unsupported record type: {record_type}"
            )));
        }

        self.ctx
            .public_api
            .dns_lookup(&domain, &record_type)
            .await
            .map_err(|e| {
                log::warn!("DNS lookup {domain}/{record_type} failed: {e}");
                CoreError::request(e, "Failed to check DNS")
            })
    }

    /// Check whether public resolvers already see the hosting nameservers.
    pub async fn propagation(&self, domain: &str) -> CoreResult<PropagationReport> {
        let domain = normalize_domain(domain)?;
        self.ctx
            .public_api
            .dns_propagation(&domain)
            .await
            .map_err(|e| {
                log::warn!("Propagation check for {domain} failed: {e}");
                CoreError::request(e, "Failed to check propagation")
            })
    }
}

fn normalize_domain(domain: &str) -> CoreResult<String> {
    let domain = domain.trim();
    if domain.is_empty() {
        return Err(CoreError::InvalidInput(DOMAIN_REQUIRED.to_string()));
    }
    Ok(domain.to_string())
}
