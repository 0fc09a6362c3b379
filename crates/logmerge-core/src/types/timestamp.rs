use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::fmt;

use crate::error::{MergeError, Result};

/// A normalized point in time plus the zone label it renders with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    instant: DateTime<FixedOffset>,
    zone: String,
}

impl Timestamp {
    pub fn new(instant: DateTime<FixedOffset>, zone: impl Into<String>) -> Self {
        Self {
            instant,
            zone: zone.into(),
        }
    }

    /// Rebuild a timestamp from its stored columns
    pub fn from_parts(epoch: i64, offset_secs: i32, zone: impl Into<String>) -> Result<Self> {
        let offset = FixedOffset::east_opt(offset_secs)
            .ok_or_else(|| MergeError::Store(format!("Invalid UTC offset {}", offset_secs)))?;
        let instant = Utc
            .timestamp_opt(epoch, 0)
            .single()
            .ok_or_else(|| MergeError::Store(format!("Invalid epoch {}", epoch)))?
            .with_timezone(&offset);
        Ok(Self::new(instant, zone))
    }

    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn epoch_seconds(&self) -> i64 {
        self.instant.timestamp()
    }

    pub fn offset_seconds(&self) -> i32 {
        self.instant.offset().local_minus_utc()
    }

    /// Layout text used for duplicate detection: `YYYYMMDD HHMMSS ZZZ`
    pub fn key(&self) -> String {
        format!("{} {}", self.instant.format("%Y%m%d %H%M%S"), self.zone)
    }

    /// Wire form: `YYYYMMDD-DDD-HHMMSS-ZZZ`
    pub fn render(&self) -> String {
        format!("{}-{}", self.instant.format("%Y%m%d-%a-%H%M%S"), self.zone)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(rfc3339: &str, zone: &str) -> Timestamp {
        Timestamp::new(DateTime::parse_from_rfc3339(rfc3339).unwrap(), zone)
    }

    #[test]
    fn test_render_and_key() {
        let ts = stamp("2023-06-15T14:30:22+00:00", "UTC");
        assert_eq!(ts.render(), "20230615-Thu-143022-UTC");
        assert_eq!(ts.key(), "20230615 143022 UTC");
        assert_eq!(ts.to_string(), ts.render());
    }

    #[test]
    fn test_weekday_follows_zone() {
        // 01:00 UTC on a Friday is still Thursday evening in PDT
        let ts = stamp("2023-06-15T18:00:00-07:00", "PDT");
        assert_eq!(ts.render(), "20230615-Thu-180000-PDT");
        assert_eq!(ts.offset_seconds(), -7 * 3600);
    }

    #[test]
    fn test_from_parts() {
        let original = stamp("2023-06-15T09:30:22-05:00", "EST");
        let rebuilt = Timestamp::from_parts(
            original.epoch_seconds(),
            original.offset_seconds(),
            original.zone(),
        )
        .unwrap();
        assert_eq!(rebuilt, original);
        assert_eq!(rebuilt.key(), original.key());

        assert!(Timestamp::from_parts(0, 100_000, "UTC").is_err());
    }
}
