//! Field value decoding.
//!
//! Individual values never fail: anything blank or unparseable becomes
//! [`DbfValue::Null`] so one bad cell cannot reject a well-formed record.

use chrono::NaiveDate;
use encoding_rs::Encoding;

use sih_common::{decode_single_byte, trim_field_bytes};

use crate::types::{DbfValue, FieldDescriptor, FieldType};

/// Decode the bytes of one field.
pub fn decode_field(bytes: &[u8], field: &FieldDescriptor, encoding: &'static Encoding) -> DbfValue {
    match field.field_type {
        FieldType::Character => decode_character(bytes, encoding),
        FieldType::Numeric | FieldType::Float => decode_numeric(bytes, field.decimal_count),
        FieldType::Date => decode_date(bytes),
        FieldType::Logical => decode_logical(bytes),
        // Memo payloads live in a companion file that is never opened.
        FieldType::Memo => DbfValue::Null,
    }
}

/// Decode a character value, trimming trailing padding.
pub fn decode_character(bytes: &[u8], encoding: &'static Encoding) -> DbfValue {
    DbfValue::Character(decode_single_byte(trim_field_bytes(bytes), encoding))
}

/// Decode an ASCII number.
///
/// Integers are produced when the field declares no decimals and the text is
/// integral; otherwise a decimal carrying the scale used for rendering.
pub fn decode_numeric(bytes: &[u8], decimal_count: u8) -> DbfValue {
    let text = ascii_trim(bytes);
    if text.is_empty() || text.iter().all(|&b| b == b'*') {
        return DbfValue::Null;
    }
    let Ok(text) = std::str::from_utf8(text) else {
        return DbfValue::Null;
    };
    let text = text.replace(',', ".");

    if decimal_count == 0
        && let Ok(value) = text.parse::<i64>()
    {
        return DbfValue::Integer(value);
    }

    if !text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
    {
        return DbfValue::Null;
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            let scale = if decimal_count > 0 {
                decimal_count
            } else {
                fraction_digits(&text)
            };
            DbfValue::Decimal { value, scale }
        }
        _ => DbfValue::Null,
    }
}

/// Decode a compact `YYYYMMDD` date.
pub fn decode_date(bytes: &[u8]) -> DbfValue {
    parse_compact_date(ascii_trim(bytes)).map_or(DbfValue::Null, DbfValue::Date)
}

/// Decode a logical flag.
pub fn decode_logical(bytes: &[u8]) -> DbfValue {
    match ascii_trim(bytes).first() {
        Some(b'T' | b't' | b'Y' | b'y') => DbfValue::Logical(true),
        Some(b'F' | b'f' | b'N' | b'n') => DbfValue::Logical(false),
        _ => DbfValue::Null,
    }
}

/// Parse exactly eight ASCII digits as a calendar date.
pub fn parse_compact_date(bytes: &[u8]) -> Option<NaiveDate> {
    if bytes.len() != 8 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let number = |range: std::ops::Range<usize>| {
        bytes[range]
            .iter()
            .fold(0u32, |acc, &b| acc * 10 + u32::from(b - b'0'))
    };
    let year = i32::try_from(number(0..4)).ok()?;
    NaiveDate::from_ymd_opt(year, number(4..6), number(6..8))
}

fn ascii_trim(bytes: &[u8]) -> &[u8] {
    let is_pad = |b: &u8| *b == b' ' || *b == 0;
    let start = bytes.iter().position(|b| !is_pad(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !is_pad(b)).map_or(start, |idx| idx + 1);
    &bytes[start..end]
}

fn fraction_digits(text: &str) -> u8 {
    text.split_once('.')
        .map(|(_, fraction)| fraction.bytes().take_while(u8::is_ascii_digit).count())
        .map_or(0, |count| u8::try_from(count).unwrap_or(u8::MAX))
}
