//! Line parser for pubsub log records
//!
//! Lines look like `YYYYMMDD-DDD-HHMMSS-ZZZ|NAME_NODE|MESSAGE`. Anything that
//! does not have that shape is reported as [`ParsedLine::Unformatted`] so the
//! caller can keep it verbatim. A stamp with the right shape that does not
//! hold a valid date and time is a hard error.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use std::ops::Range;

use crate::error::{MergeError, Result};
use crate::types::Record;
use crate::zone::{self, ZoneNormalizer};

/// Length of the timestamp token in bytes
pub const STAMP_LEN: usize = 23;

const DATE: Range<usize> = 0..8;
const TIME: Range<usize> = 13..19;
const ZONE: Range<usize> = 20..23;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Record(Record),
    Unformatted,
}

impl ParsedLine {
    pub fn into_record(self) -> Option<Record> {
        match self {
            Self::Record(record) => Some(record),
            Self::Unformatted => None,
        }
    }
}

/// Parse one input line
pub fn parse_line(line: &str, zones: &ZoneNormalizer) -> Result<ParsedLine> {
    let mut fields = line.splitn(3, '|');
    let (Some(stamp), Some(who), Some(message)) = (fields.next(), fields.next(), fields.next())
    else {
        return Ok(ParsedLine::Unformatted);
    };

    if stamp.len() != STAMP_LEN {
        return Ok(ParsedLine::Unformatted);
    }
    let instant = parse_stamp(stamp)?;

    let Some((name, node)) = who.split_once('_') else {
        return Ok(ParsedLine::Unformatted);
    };

    Ok(ParsedLine::Record(Record::new(
        zones.normalize(instant),
        name,
        node,
        message,
    )))
}

/// Parse a 23-byte stamp token into the instant it names
///
/// The weekday portion is ignored.
pub fn parse_stamp(token: &str) -> Result<DateTime<FixedOffset>> {
    let date = slice(token, DATE)?;
    let time = slice(token, TIME)?;
    let abbrev = slice(token, ZONE)?;

    if !date.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MergeError::timestamp(token, "date must be 8 digits"));
    }
    if !time.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MergeError::timestamp(token, "time must be 6 digits"));
    }
    // chrono reads second 60 as a leap second
    if &time[4..6] >= "60" {
        return Err(MergeError::timestamp(token, "second out of range"));
    }
    if !abbrev.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(MergeError::timestamp(token, "zone must be 3 uppercase letters"));
    }

    let date = NaiveDate::parse_from_str(date, "%Y%m%d")
        .map_err(|e| MergeError::timestamp(token, e.to_string()))?;
    let time = NaiveTime::parse_from_str(time, "%H%M%S")
        .map_err(|e| MergeError::timestamp(token, e.to_string()))?;

    date.and_time(time)
        .and_local_timezone(zone::resolve(abbrev))
        .single()
        .ok_or_else(|| MergeError::timestamp(token, "time does not exist in zone"))
}

fn slice(token: &str, range: Range<usize>) -> Result<&str> {
    token
        .get(range)
        .ok_or_else(|| MergeError::timestamp(token, "not an ASCII stamp"))
}
