//! Order date normalization
//!
//! Stored documents carry their creation date either as a store timestamp
//! (`{seconds, nanoseconds}`) or, for older records, as a free-form string.
//! Everything that compares dates goes through [`DateValue::to_instant`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Store timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    #[serde(alias = "_seconds")]
    pub seconds: i64,
    #[serde(default, alias = "_nanoseconds")]
    pub nanoseconds: u32,
}

impl Timestamp {
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self {
            seconds: dt.timestamp(),
            nanoseconds: dt.timestamp_subsec_nanos(),
        }
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanoseconds)
    }
}

/// Date field as found in order documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Timestamp(Timestamp),
    Legacy(String),
}

/// Naive date-time layouts accepted for legacy strings (business-local time)
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

impl DateValue {
    pub fn now() -> Self {
        Self::from_instant(Utc::now())
    }

    pub fn from_instant(dt: DateTime<Utc>) -> Self {
        DateValue::Timestamp(Timestamp::from_datetime(dt))
    }

    /// Resolve to an instant
    ///
    /// Legacy strings without an offset are read in the business timezone
    /// `tz`; a bare `YYYY-MM-DD` is midnight of that day. Returns `None` for
    /// anything unparseable, so callers can exclude such records.
    pub fn to_instant(&self, tz: Tz) -> Option<DateTime<Utc>> {
        match self {
            DateValue::Timestamp(ts) => ts.to_datetime(),
            DateValue::Legacy(raw) => parse_legacy(raw.trim(), tz),
        }
    }
}

fn parse_legacy(raw: &str, tz: Tz) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return local_to_utc(naive, tz);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|naive| local_to_utc(naive, tz))
}

/// DST gaps have no local mapping; ambiguous times take the earlier instant
fn local_to_utc(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_timestamp_round_trip() {
        let now = Utc.with_ymd_and_hms(2024, 5, 17, 12, 30, 0).unwrap();
        let value = DateValue::from_instant(now);
        assert_eq!(value.to_instant(Tz::UTC), Some(now));
    }

    #[test]
    fn test_deserialize_store_timestamp() {
        let value: DateValue =
            serde_json::from_str(r#"{"seconds": 1715949000, "nanoseconds": 0}"#).unwrap();
        assert!(matches!(value, DateValue::Timestamp(_)));

        let exported: DateValue =
            serde_json::from_str(r#"{"_seconds": 1715949000, "_nanoseconds": 5}"#).unwrap();
        assert_eq!(
            exported,
            DateValue::Timestamp(Timestamp {
                seconds: 1715949000,
                nanoseconds: 5
            })
        );
    }

    #[test]
    fn test_legacy_rfc3339() {
        let value = DateValue::Legacy("2024-05-17T10:00:00Z".into());
        let instant = value.to_instant(chrono_tz::America::Mexico_City).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 5, 17, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_legacy_naive_uses_business_timezone() {
        let value = DateValue::Legacy("2024-05-17 10:00".into());
        // Mexico City is UTC-6 (no DST since 2022)
        let instant = value.to_instant(chrono_tz::America::Mexico_City).unwrap();
        assert_eq!(instant.hour(), 16);
    }

    #[test]
    fn test_legacy_date_only_is_local_midnight() {
        let value = DateValue::Legacy("2024-05-17".into());
        let instant = value.to_instant(chrono_tz::Europe::Madrid).unwrap();
        // Madrid is UTC+2 in May
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 5, 16, 22, 0, 0).unwrap());
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(DateValue::Legacy("ayer".into()).to_instant(Tz::UTC), None);
        assert_eq!(DateValue::Legacy(String::new()).to_instant(Tz::UTC), None);
    }
}
