//! Zone abbreviations and output-zone normalization
//!
//! Publishers stamp their lines with a 3-letter zone abbreviation. Each known
//! abbreviation maps to a fixed offset; unknown but well-formed abbreviations
//! are read at offset zero.

use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Utc};
use std::sync::Once;

use crate::error::{MergeError, Result};
use crate::types::Timestamp;

const HOUR: i32 = 3600;

static UTC_FALLBACK: Once = Once::new();

/// Known abbreviations and their offsets in seconds east of UTC.
///
/// Reverse lookup returns the first entry for an offset, so the preferred
/// label for an offset must come before its aliases.
const ZONES: &[(&str, i32)] = &[
    ("UTC", 0),
    ("GMT", 0),
    ("WET", 0),
    ("CET", HOUR),
    ("BST", HOUR),
    ("EET", 2 * HOUR),
    ("MSK", 3 * HOUR),
    ("IST", 5 * HOUR + 1800),
    ("HKT", 8 * HOUR),
    ("SGT", 8 * HOUR),
    ("JST", 9 * HOUR),
    ("KST", 9 * HOUR),
    ("EST", -5 * HOUR),
    ("EDT", -4 * HOUR),
    ("AST", -4 * HOUR),
    ("CST", -6 * HOUR),
    ("CDT", -5 * HOUR),
    ("MST", -7 * HOUR),
    ("MDT", -6 * HOUR),
    ("PST", -8 * HOUR),
    ("PDT", -7 * HOUR),
    ("HST", -10 * HOUR),
];

/// Offset for a known abbreviation
pub fn offset_for(abbrev: &str) -> Option<FixedOffset> {
    ZONES
        .iter()
        .find(|(name, _)| *name == abbrev)
        .and_then(|(_, secs)| FixedOffset::east_opt(*secs))
}

/// Preferred abbreviation for an offset
pub fn abbrev_for(offset_secs: i32) -> Option<&'static str> {
    ZONES
        .iter()
        .find(|(_, secs)| *secs == offset_secs)
        .map(|(name, _)| *name)
}

/// Offset used for a well-formed abbreviation
///
/// Unknown abbreviations resolve to UTC+0.
pub fn resolve(abbrev: &str) -> FixedOffset {
    offset_for(abbrev).unwrap_or_else(|| Utc.fix())
}

/// Converts parsed instants into the zone every stored record shares
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneNormalizer {
    /// The process's local offset at each instant
    ///
    /// The label is the first table abbreviation for that offset, not the
    /// OS zone name: a +01:00 host is labelled `CET` even during BST.
    /// Offsets missing from the table normalize to UTC.
    Local,
    /// A fixed zone from the abbreviation table
    Fixed {
        abbrev: &'static str,
        offset: FixedOffset,
    },
}

impl ZoneNormalizer {
    pub fn local() -> Self {
        Self::Local
    }

    pub fn utc() -> Self {
        Self::Fixed {
            abbrev: "UTC",
            offset: Utc.fix(),
        }
    }

    /// Normalize into a named zone; the abbreviation must be in the table
    pub fn named(abbrev: &str) -> Result<Self> {
        let upper = abbrev.to_ascii_uppercase();
        ZONES
            .iter()
            .find(|(name, _)| *name == upper)
            .and_then(|(name, secs)| {
                FixedOffset::east_opt(*secs).map(|offset| Self::Fixed {
                    abbrev: *name,
                    offset,
                })
            })
            .ok_or_else(|| MergeError::Config(format!("Unknown time zone '{}'", abbrev)))
    }

    /// Convert an instant into the output zone
    ///
    /// In local mode an offset without a 3-letter abbreviation falls back to
    /// UTC so the rendered line stays parseable.
    pub fn normalize(&self, instant: DateTime<FixedOffset>) -> Timestamp {
        match self {
            Self::Local => {
                let offset: FixedOffset = Local.offset_from_utc_datetime(&instant.naive_utc());
                at_local_offset(instant, offset)
            }
            Self::Fixed { abbrev, offset } => {
                Timestamp::new(instant.with_timezone(offset), *abbrev)
            }
        }
    }
}

/// Label `instant` at a local offset, or fall back to UTC when the offset
/// has no 3-letter abbreviation
fn at_local_offset(instant: DateTime<FixedOffset>, offset: FixedOffset) -> Timestamp {
    match abbrev_for(offset.local_minus_utc()) {
        Some(abbrev) => Timestamp::new(instant.with_timezone(&offset), abbrev),
        None => {
            UTC_FALLBACK.call_once(|| {
                tracing::warn!(
                    "Local offset {} has no zone abbreviation, writing records in UTC",
                    offset
                );
            });
            Timestamp::new(instant.with_timezone(&Utc.fix()), "UTC")
        }
    }
}

impl Default for ZoneNormalizer {
    fn default() -> Self {
        Self::local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_offsets() {
        assert_eq!(offset_for("UTC").unwrap().local_minus_utc(), 0);
        assert_eq!(offset_for("EST").unwrap().local_minus_utc(), -5 * HOUR);
        assert_eq!(offset_for("IST").unwrap().local_minus_utc(), 5 * HOUR + 1800);
        assert!(offset_for("XYZ").is_none());
    }

    #[test]
    fn test_unknown_abbreviation_reads_as_utc() {
        assert_eq!(resolve("XYZ").local_minus_utc(), 0);
        assert_eq!(resolve("PDT").local_minus_utc(), -7 * HOUR);
    }

    #[test]
    fn test_reverse_lookup_round_trips() {
        for (name, secs) in ZONES {
            let label = abbrev_for(*secs).unwrap();
            assert_eq!(offset_for(label).unwrap().local_minus_utc(), *secs, "{}", name);
        }
        assert_eq!(abbrev_for(-4 * HOUR), Some("EDT"));
        assert_eq!(abbrev_for(12345), None);
    }

    #[test]
    fn test_named_normalizer() {
        let est = ZoneNormalizer::named("est").unwrap();
        let instant = DateTime::parse_from_rfc3339("2023-06-15T14:30:22+00:00").unwrap();
        let stamp = est.normalize(instant);
        assert_eq!(stamp.zone(), "EST");
        assert_eq!(stamp.key(), "20230615 093022 EST");
        assert_eq!(stamp.epoch_seconds(), instant.timestamp());

        assert!(matches!(
            ZoneNormalizer::named("Mars"),
            Err(MergeError::Config(_))
        ));
    }

    #[test]
    fn test_unlabelled_local_offset_falls_back_to_utc() {
        let instant = DateTime::parse_from_rfc3339("2023-06-15T14:30:22+00:00").unwrap();

        let aest = FixedOffset::east_opt(10 * HOUR).unwrap();
        let stamp = at_local_offset(instant, aest);
        assert_eq!(stamp.zone(), "UTC");
        assert_eq!(stamp.key(), "20230615 143022 UTC");

        let paris = FixedOffset::east_opt(HOUR).unwrap();
        let stamp = at_local_offset(instant, paris);
        assert_eq!(stamp.zone(), "CET");
        assert_eq!(stamp.key(), "20230615 153022 CET");
        assert_eq!(stamp.epoch_seconds(), instant.timestamp());
    }

    #[test]
    fn test_local_normalizer_keeps_instant() {
        let instant = DateTime::parse_from_rfc3339("2023-01-02T03:04:05-05:00").unwrap();
        let stamp = ZoneNormalizer::local().normalize(instant);
        assert_eq!(stamp.epoch_seconds(), instant.timestamp());
        assert_eq!(stamp.zone().len(), 3);
        assert!(offset_for(stamp.zone()).is_some());
    }
}
