//! Serde helpers for the `YYYY-MM-DD HH:MM:SS` timestamp wire format (UTC).

use chrono::{DateTime, Utc};
use serde::Serializer;

/// Wire format for all timestamps
pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a timestamp for responses
pub fn format(value: &DateTime<Utc>) -> String {
    value.format(FORMAT).to_string()
}

/// `#[serde(serialize_with = "timestamp::serialize")]`
pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(value))
}

/// `#[serde(serialize_with = "timestamp::serialize_option")]`
pub fn serialize_option<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(value) => serializer.serialize_str(&format(value)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Stamped {
        #[serde(serialize_with = "serialize")]
        at: DateTime<Utc>,
        #[serde(serialize_with = "serialize_option")]
        maybe: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_format() {
        let at = Utc.with_ymd_and_hms(2025, 3, 4, 4, 44, 15).unwrap();
        assert_eq!(format(&at), "2025-03-04 04:44:15");
    }

    #[test]
    fn test_serialize_fields() {
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let json = serde_json::to_value(Stamped { at, maybe: None }).unwrap();

        assert_eq!(json["at"], "2025-01-02 03:04:05");
        assert!(json["maybe"].is_null());

        let json = serde_json::to_value(Stamped { at, maybe: Some(at) }).unwrap();
        assert_eq!(json["maybe"], "2025-01-02 03:04:05");
    }
}
