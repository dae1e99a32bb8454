//! Compact date normalization.

use chrono::NaiveDate;
use sih_dbf::decode::parse_compact_date;

/// Parses a trimmed `YYYYMMDD` string into a calendar date.
pub fn normalize_date(value: Option<&str>) -> Option<NaiveDate> {
    parse_compact_date(value?.trim().as_bytes())
}
