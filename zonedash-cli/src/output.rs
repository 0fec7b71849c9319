//! Output formatting for CLI responses.
//!
//! Every result prints either as a human-readable block or as JSON for
//! scripts (`--json`).

use std::fmt::Write as _;

use serde::Serialize;
use zonedash_api::{
    LookupReport, PropagationReport, PublicStats, RecordSet, User, Zone, ZoneStatus,
};
use zonedash_core::controllers::{
    EXPECTED_NAMESERVERS, RecordUsage, StatsView, VerificationFailure, ZoneSummary,
};
use zonedash_core::notify::Toast;

/// Trait for types that can be output in multiple formats.
pub trait Outputable {
    /// Convert to JSON value for structured output.
    fn to_json(&self) -> serde_json::Value;

    /// Convert to human-readable string.
    fn to_human(&self) -> String;
}

/// Print a value in the appropriate format.
pub fn print_output<T: Outputable>(value: &T, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&value.to_json())
                .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize: {e}\"}}"))
        );
    } else {
        println!("{}", value.to_human());
    }
}

/// Print a success message.
pub fn print_success(message: &str, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "status": "success",
                "message": message
            })
        );
    } else {
        println!("{message}");
    }
}

/// Print the toasts a command raised, on stderr so stdout stays parseable.
pub fn print_toasts(toasts: &[Toast]) {
    for toast in toasts {
        eprintln!("[{}] {}", toast.severity, toast.message);
    }
}

fn json_of<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

fn date(value: Option<&chrono::DateTime<chrono::Utc>>) -> String {
    value.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

// ============ Zones ============

pub struct ZoneListOutput {
    pub zones: Vec<Zone>,
    pub summary: ZoneSummary,
}

impl Outputable for ZoneListOutput {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "zones": json_of(&self.zones),
            "summary": json_of(&self.summary),
        })
    }

    fn to_human(&self) -> String {
        let mut out = String::new();
        if self.zones.is_empty() {
            out.push_str("No zones found.\n");
        } else {
            let _ = writeln!(out, "{:<26} {:<32} {:<8} {:>7}  CREATED", "ID", "NAME", "STATUS", "RECORDS");
            for z in &self.zones {
                let _ = writeln!(
                    out,
                    "{:<26} {:<32} {:<8} {:>7}  {}",
                    z.id,
                    z.name,
                    z.status.label(),
                    z.records_count,
                    date(z.created_at.as_ref())
                );
            }
        }
        let _ = write!(
            out,
            "\nTotal: {}  Active: {}  Pending: {}",
            self.summary.total, self.summary.active, self.summary.pending
        );
        out
    }
}

pub struct ZoneOutput {
    pub zone: Zone,
    pub usage: Option<RecordUsage>,
    pub records: Vec<RecordSet>,
}

impl Outputable for ZoneOutput {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "zone": json_of(&self.zone),
            "records": json_of(&self.records),
        })
    }

    fn to_human(&self) -> String {
        let z = &self.zone;
        let mut out = format!(
            "Zone {}\n\
             ======{}\n\
             ID:       {}\n\
             Status:   {}\n\
             Created:  {}\n",
            z.name,
            "=".repeat(z.name.len()),
            z.id,
            z.status.label(),
            date(z.created_at.as_ref()),
        );
        if let Some(usage) = self.usage {
            let _ = writeln!(
                out,
                "Records:  {}/{}{}",
                usage.count,
                usage.limit,
                if usage.limit_reached { " (limit reached)" } else { "" }
            );
        }
        if z.status == ZoneStatus::PendingVerification {
            let _ = writeln!(
                out,
                "\nPoint the domain's nameservers at {} and run `zonedash zones verify {}`.",
                EXPECTED_NAMESERVERS.join(", "),
                z.id
            );
        }
        out.push('\n');
        out.push_str(&RecordListOutput::render(&self.records));
        out
    }
}

pub struct RecordListOutput {
    pub records: Vec<RecordSet>,
}

impl RecordListOutput {
    fn render(records: &[RecordSet]) -> String {
        if records.is_empty() {
            return "No records found.".to_string();
        }
        let mut out = format!("{:<32} {:<6} {:>6}  CONTENT", "NAME", "TYPE", "TTL");
        for set in records {
            for value in &set.records {
                let _ = write!(
                    out,
                    "\n{:<32} {:<6} {:>6}  {}{}",
                    set.name,
                    set.record_type,
                    set.ttl,
                    value.content,
                    if value.disabled { " (disabled)" } else { "" }
                );
            }
        }
        out
    }
}

impl Outputable for RecordListOutput {
    fn to_json(&self) -> serde_json::Value {
        json_of(&self.records)
    }

    fn to_human(&self) -> String {
        Self::render(&self.records)
    }
}

pub struct VerificationOutput<'a>(pub &'a VerificationFailure);

impl Outputable for VerificationOutput<'_> {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "status": "failed",
            "message": self.0.message,
            "expected": EXPECTED_NAMESERVERS,
            "current": self.0.current_nameservers,
        })
    }

    fn to_human(&self) -> String {
        let mut out = format!(
            "Verification failed: {}\nExpected nameservers: {}",
            self.0.message,
            EXPECTED_NAMESERVERS.join(", ")
        );
        if let Some(current) = &self.0.current_nameservers {
            let current = if current.is_empty() {
                "(none)".to_string()
            } else {
                current.join(", ")
            };
            let _ = write!(out, "\nCurrent nameservers:  {current}");
        }
        out
    }
}

// ============ Account ============

pub struct UserOutput(pub User);

impl Outputable for UserOutput {
    fn to_json(&self) -> serde_json::Value {
        json_of(&self.0)
    }

    fn to_human(&self) -> String {
        let u = &self.0;
        format!(
            "Name:    {}\nEmail:   {}\nGitHub:  {}\nSince:   {}",
            u.name.as_deref().unwrap_or("-"),
            u.email,
            if u.github_id.is_some() { "linked" } else { "not linked" },
            date(u.created_at.as_ref())
        )
    }
}

// ============ Public ============

pub struct StatsOutput {
    pub raw: PublicStats,
    pub view: StatsView,
}

impl Outputable for StatsOutput {
    fn to_json(&self) -> serde_json::Value {
        json_of(&self.raw)
    }

    fn to_human(&self) -> String {
        let v = &self.view;
        format!(
            "Queries:      {}\n\
             Zones:        {}\n\
             Records:      {}\n\
             UDP answers:  {}\n\
             TCP answers:  {}\n\
             Avg latency:  {}\n\
             Uptime:       {}",
            v.total_queries,
            v.total_zones,
            v.total_records,
            v.udp_answers,
            v.tcp_answers,
            v.avg_latency,
            v.uptime
        )
    }
}

pub struct LookupOutput(pub LookupReport);

impl Outputable for LookupOutput {
    fn to_json(&self) -> serde_json::Value {
        json_of(&self.0)
    }

    fn to_human(&self) -> String {
        let mut out = format!("Results for {} ({})", self.0.domain, self.0.record_type);
        for (key, answer) in &self.0.results {
            let provider = if answer.provider.is_empty() {
                key.as_str()
            } else {
                answer.provider.as_str()
            };
            let detail = match (&answer.error, &answer.records) {
                (Some(err), _) => format!("error: {err}"),
                (None, serde_json::Value::Array(items)) if items.is_empty() => {
                    "no records".to_string()
                }
                (None, serde_json::Value::Array(items)) => items
                    .iter()
                    .map(|v| v.as_str().map_or_else(|| v.to_string(), ToString::to_string))
                    .collect::<Vec<_>>()
                    .join(", "),
                (None, other) => other.to_string(),
            };
            let _ = write!(out, "\n  {provider:<14} {detail}");
        }
        out
    }
}

pub struct PropagationOutput(pub PropagationReport);

impl Outputable for PropagationOutput {
    fn to_json(&self) -> serde_json::Value {
        json_of(&self.0)
    }

    fn to_human(&self) -> String {
        let r = &self.0;
        let mut out = format!(
            "Propagation for {}: {:.0}% ({}/{} resolvers){}",
            r.domain,
            r.propagation_percentage,
            r.summary.valid,
            r.summary.total,
            if r.propagated { ", propagated" } else { "" }
        );
        for (key, check) in &r.details {
            let provider = if check.provider.is_empty() {
                key.as_str()
            } else {
                check.provider.as_str()
            };
            let status = match &check.error {
                Some(err) => format!("error: {err}"),
                None if check.has_expected_ns => "ok".to_string(),
                None => "pending".to_string(),
            };
            let _ = write!(
                out,
                "\n  {provider:<14} {status:<10} {}",
                check.current_ns.join(", ")
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use zonedash_api::{RecordType, RecordValue};

    use super::*;

    fn zone(status: ZoneStatus) -> Zone {
        Zone {
            id: "z1".to_string(),
            name: "example.com".to_string(),
            status,
            records_count: 3,
            record_limit: 200,
            created_at: None,
            updated_at: None,
            rrsets: None,
        }
    }

    #[test]
    fn zone_list_human_and_json() {
        let out = ZoneListOutput {
            zones: vec![zone(ZoneStatus::Active)],
            summary: ZoneSummary {
                total: 1,
                pending: 0,
                active: 1,
            },
        };
        let human = out.to_human();
        assert!(human.contains("example.com"));
        assert!(human.contains("Total: 1  Active: 1  Pending: 0"));
        assert_eq!(out.to_json()["summary"]["total"], 1);
    }

    #[test]
    fn pending_zone_shows_expected_nameservers() {
        let out = ZoneOutput {
            zone: zone(ZoneStatus::PendingVerification),
            usage: None,
            records: Vec::new(),
        };
        let human = out.to_human();
        assert!(human.contains("ns1.stackryze.com, ns2.stackryze.com"));
        assert!(human.contains("No records found."));
    }

    #[test]
    fn unmodelled_status_shows_raw_label() {
        let out = ZoneOutput {
            zone: zone(ZoneStatus::Other("suspended".to_string())),
            usage: None,
            records: Vec::new(),
        };
        let human = out.to_human();
        assert!(human.contains("Status:   suspended"));
        assert!(!human.contains("Point the domain"));
    }

    #[test]
    fn records_render_one_line_per_value() {
        let out = RecordListOutput {
            records: vec![RecordSet {
                name: "www".to_string(),
                record_type: RecordType::A,
                ttl: 3600,
                records: vec![
                    RecordValue {
                        content: "192.0.2.1".to_string(),
                        disabled: false,
                    },
                    RecordValue {
                        content: "192.0.2.2".to_string(),
                        disabled: true,
                    },
                ],
            }],
        };
        let human = out.to_human();
        assert_eq!(human.lines().count(), 3);
        assert!(human.contains("192.0.2.2 (disabled)"));
    }

    #[test]
    fn verification_failure_lists_current() {
        let failure = VerificationFailure {
            message: "Nameservers not updated".to_string(),
            current_nameservers: Some(vec!["ns1.registrar.net".to_string()]),
        };
        let human = VerificationOutput(&failure).to_human();
        assert!(human.contains("Current nameservers:  ns1.registrar.net"));
    }
}
