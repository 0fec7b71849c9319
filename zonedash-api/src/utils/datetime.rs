//! Date/time serde helpers
//!
//! - Serialize: `DateTime<Utc>` -> RFC3339 string
//! - Deserialize: RFC3339 string or Unix timestamp (seconds or milliseconds) -> `DateTime<Utc>`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Serialize `Option<DateTime<Utc>>` as an optional RFC3339 string.
#[allow(clippy::ref_option)]
pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

/// Deserialize an RFC3339 string or a Unix timestamp (seconds/milliseconds detected).
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OptionalTimestamp {
        String(String),
        I64(i64),
    }

    match Option::<OptionalTimestamp>::deserialize(deserializer)? {
        Some(OptionalTimestamp::String(s)) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| Error::custom(format!("Invalid RFC3339 timestamp: {e}"))),
        Some(OptionalTimestamp::I64(ts)) => parse_unix_timestamp(ts)
            .map(Some)
            .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
        None => Ok(None),
    }
}

/// Values above 10^11 are taken as milliseconds, everything else as seconds.
fn parse_unix_timestamp(ts: i64) -> Option<DateTime<Utc>> {
    if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Stamped {
        #[serde(default, with = "crate::utils::datetime")]
        at: Option<chrono::DateTime<chrono::Utc>>,
    }

    #[test]
    fn parses_mongo_style_iso_string() {
        let s: Stamped = serde_json::from_str(r#"{"at":"2024-03-01T10:00:00.000Z"}"#).unwrap();
        assert_eq!(s.at.unwrap().timestamp(), 1_709_287_200);
    }

    #[test]
    fn parses_millisecond_timestamp() {
        let s: Stamped = serde_json::from_str(r#"{"at":1709287200000}"#).unwrap();
        assert_eq!(s.at.unwrap().timestamp(), 1_709_287_200);
    }

    #[test]
    fn missing_and_null_are_none() {
        let s: Stamped = serde_json::from_str("{}").unwrap();
        assert!(s.at.is_none());
        let s: Stamped = serde_json::from_str(r#"{"at":null}"#).unwrap();
        assert!(s.at.is_none());
    }
}
