//! DBF header and field descriptor parsing and building.
//!
//! # Header Structure
//!
//! | Offset | Size | Description                                  |
//! |--------|------|----------------------------------------------|
//! | 0      | 1    | Version byte                                 |
//! | 1-3    | 3    | Last update (YY since 1900, MM, DD)          |
//! | 4-7    | 4    | Record count (u32, little endian)            |
//! | 8-9    | 2    | Header length in bytes (u16, little endian)  |
//! | 10-11  | 2    | Record length in bytes (u16, little endian)  |
//! | 12-31  | 20   | Reserved                                     |
//!
//! The prefix is followed by one 32-byte descriptor per field and a `0x0D`
//! terminator. Visual FoxPro tables append a 263-byte backlink area.
//!
//! # Field Descriptor (32 bytes)
//!
//! | Offset | Size | Description                          |
//! |--------|------|--------------------------------------|
//! | 0-10   | 11   | Name, NUL padded                     |
//! | 11     | 1    | Type tag (C, N, F, D, L, M)          |
//! | 12-15  | 4    | Reserved (field displacement)        |
//! | 16     | 1    | Field length                         |
//! | 17     | 1    | Decimal count                        |
//! | 18-31  | 14   | Reserved                             |

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use crate::error::{DbfError, Result};
use crate::types::{FieldDescriptor, FieldType};

/// Length of the fixed header prefix.
pub const HEADER_PREFIX_LEN: usize = 32;

/// Length of one field descriptor.
pub const DESCRIPTOR_LEN: usize = 32;

/// Byte closing the descriptor block.
pub const HEADER_TERMINATOR: u8 = 0x0D;

/// Optional byte after the last record.
pub const END_OF_FILE: u8 = 0x1A;

/// Deletion flag of a logically deleted record.
pub const DELETED_FLAG: u8 = b'*';

/// Deletion flag of an active record.
pub const ACTIVE_FLAG: u8 = b' ';

/// Size of the Visual FoxPro database container backlink.
pub const FOXPRO_BACKLINK_LEN: usize = 263;

/// Maximum field name length.
pub const MAX_FIELD_NAME_LEN: usize = 10;

/// Version byte written for plain dBase III tables.
pub const DBASE3_VERSION: u8 = 0x03;

/// Fixed header fields read from the 32-byte prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderPrefix {
    pub version: u8,
    pub last_update: Option<NaiveDate>,
    pub record_count: u32,
    pub header_length: u16,
    pub record_length: u16,
}

/// Parsed table header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHeader {
    /// Version byte.
    pub version: u8,
    /// Last update date, when the stored bytes form a valid date.
    pub last_update: Option<NaiveDate>,
    /// Physical record count, deleted records included.
    pub record_count: u32,
    /// Header length in bytes.
    pub header_length: u16,
    /// Record length in bytes, deletion flag included.
    pub record_length: u16,
    /// Field descriptors in record order.
    pub fields: Vec<FieldDescriptor>,
}

impl TableHeader {
    /// Find a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Field names in record order.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|field| field.name.clone()).collect()
    }
}

/// Whether the version byte denotes a Visual FoxPro table.
#[must_use]
pub fn is_foxpro(version: u8) -> bool {
    matches!(version, 0x30..=0x32)
}

/// Header length required for `field_count` descriptors.
#[must_use]
pub fn expected_header_length(version: u8, field_count: usize) -> usize {
    let base = HEADER_PREFIX_LEN + field_count * DESCRIPTOR_LEN + 1;
    if is_foxpro(version) {
        base + FOXPRO_BACKLINK_LEN
    } else {
        base
    }
}

/// Record length required for the given fields.
#[must_use]
pub fn expected_record_length(fields: &[FieldDescriptor]) -> usize {
    1 + fields
        .iter()
        .map(|field| usize::from(field.length))
        .sum::<usize>()
}

/// Parse the 32-byte header prefix.
pub fn parse_header_prefix(data: &[u8]) -> Result<HeaderPrefix> {
    if data.len() < HEADER_PREFIX_LEN {
        return Err(DbfError::invalid_header(format!(
            "file too small: {} bytes",
            data.len()
        )));
    }

    let version = data[0];
    let last_update = NaiveDate::from_ymd_opt(
        1900 + i32::from(data[1]),
        u32::from(data[2]),
        u32::from(data[3]),
    );
    let record_count = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    let header_length = u16::from_le_bytes([data[8], data[9]]);
    let record_length = u16::from_le_bytes([data[10], data[11]]);

    if usize::from(header_length) <= HEADER_PREFIX_LEN {
        return Err(DbfError::invalid_header(format!(
            "header length {header_length} leaves no room for field descriptors"
        )));
    }
    if record_length == 0 {
        return Err(DbfError::invalid_header("record length is zero"));
    }

    Ok(HeaderPrefix {
        version,
        last_update,
        record_count,
        header_length,
        record_length,
    })
}

/// Parse a single field descriptor.
///
/// # Arguments
/// * `data` - The 32 descriptor bytes
/// * `index` - Field index (for error messages)
pub fn parse_field_descriptor(data: &[u8], index: usize) -> Result<FieldDescriptor> {
    if data.len() < DESCRIPTOR_LEN {
        return Err(DbfError::invalid_field(
            index,
            format!("descriptor too short: {} bytes", data.len()),
        ));
    }

    let name_bytes = &data[0..11];
    let name_end = name_bytes.iter().position(|&b| b == 0).unwrap_or(11);
    let name_raw = &name_bytes[..name_end];
    if !name_raw.is_ascii() {
        return Err(DbfError::invalid_field(index, "field name is not ASCII"));
    }
    let name = String::from_utf8_lossy(name_raw).trim().to_string();
    if name.is_empty() {
        return Err(DbfError::invalid_field(index, "empty field name"));
    }
    if name.len() > MAX_FIELD_NAME_LEN {
        return Err(DbfError::invalid_field(
            index,
            format!("field name '{name}' is not NUL terminated"),
        ));
    }

    let tag = data[11];
    let field_type = FieldType::from_tag(tag).ok_or_else(|| {
        DbfError::invalid_field(
            index,
            format!("unknown type tag '{}' for {name}", char::from(tag)),
        )
    })?;

    let length = data[16];
    if length == 0 {
        return Err(DbfError::invalid_field(
            index,
            format!("field {name} has zero length"),
        ));
    }

    let decimal_count = data[17];
    if field_type.is_numeric() && decimal_count > 0 && decimal_count >= length {
        return Err(DbfError::invalid_field(
            index,
            format!("field {name} declares {decimal_count} decimals in {length} bytes"),
        ));
    }

    Ok(FieldDescriptor {
        name,
        field_type,
        length,
        decimal_count: if field_type.is_numeric() {
            decimal_count
        } else {
            0
        },
    })
}

/// Parse the descriptor block that follows the prefix.
///
/// Descriptors are read until the `0x0D` terminator; a block without a
/// terminator or with repeated names is rejected.
pub fn parse_field_descriptors(block: &[u8]) -> Result<Vec<FieldDescriptor>> {
    let mut fields = Vec::new();
    let mut seen = BTreeSet::new();
    let mut offset = 0usize;

    loop {
        match block.get(offset) {
            Some(&HEADER_TERMINATOR) => break,
            Some(_) => {}
            None => {
                return Err(DbfError::invalid_header(
                    "missing field descriptor terminator",
                ));
            }
        }
        let index = fields.len();
        let record = block
            .get(offset..offset + DESCRIPTOR_LEN)
            .ok_or_else(|| DbfError::invalid_field(index, "descriptor out of bounds"))?;
        let field = parse_field_descriptor(record, index)?;
        if !seen.insert(field.name.clone()) {
            return Err(DbfError::duplicate_field(field.name));
        }
        fields.push(field);
        offset += DESCRIPTOR_LEN;
    }

    if fields.is_empty() {
        return Err(DbfError::invalid_header("table declares no fields"));
    }
    Ok(fields)
}

/// Check the declared header and record lengths against the descriptors.
pub fn validate_layout(prefix: &HeaderPrefix, fields: &[FieldDescriptor]) -> Result<()> {
    let expected = expected_header_length(prefix.version, fields.len());
    let actual = usize::from(prefix.header_length);
    if expected != actual {
        return Err(DbfError::HeaderLengthMismatch {
            field_count: fields.len(),
            expected,
            actual,
        });
    }

    let expected = expected_record_length(fields);
    let actual = usize::from(prefix.record_length);
    if expected != actual {
        return Err(DbfError::RecordLengthMismatch { expected, actual });
    }
    Ok(())
}

/// Build a 32-byte field descriptor.
#[must_use]
pub fn build_field_descriptor(field: &FieldDescriptor) -> [u8; DESCRIPTOR_LEN] {
    let mut buf = [0u8; DESCRIPTOR_LEN];
    for (slot, byte) in buf[..MAX_FIELD_NAME_LEN]
        .iter_mut()
        .zip(field.name.bytes())
    {
        *slot = byte;
    }
    buf[11] = field.field_type.tag();
    buf[16] = field.length;
    buf[17] = field.decimal_count;
    buf
}

/// Build the full header: prefix, descriptors and terminator.
#[must_use]
pub fn build_header(header: &TableHeader) -> Vec<u8> {
    let mut buf = Vec::with_capacity(usize::from(header.header_length));
    buf.push(header.version);
    match header.last_update {
        Some(date) => {
            let year = u8::try_from(date.year() - 1900).unwrap_or(0);
            buf.extend_from_slice(&[year, date.month() as u8, date.day() as u8]);
        }
        None => buf.extend_from_slice(&[0, 0, 0]),
    }
    buf.extend_from_slice(&header.record_count.to_le_bytes());
    buf.extend_from_slice(&header.header_length.to_le_bytes());
    buf.extend_from_slice(&header.record_length.to_le_bytes());
    buf.resize(HEADER_PREFIX_LEN, 0);

    for field in &header.fields {
        buf.extend_from_slice(&build_field_descriptor(field));
    }
    buf.push(HEADER_TERMINATOR);
    if is_foxpro(header.version) {
        buf.resize(buf.len() + FOXPRO_BACKLINK_LEN, 0);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix_bytes(header_length: u16, record_length: u16) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_PREFIX_LEN];
        buf[0] = DBASE3_VERSION;
        buf[1] = 124;
        buf[2] = 1;
        buf[3] = 15;
        buf[4..8].copy_from_slice(&3u32.to_le_bytes());
        buf[8..10].copy_from_slice(&header_length.to_le_bytes());
        buf[10..12].copy_from_slice(&record_length.to_le_bytes());
        buf
    }

    #[test]
    fn test_parse_prefix() {
        let prefix = parse_header_prefix(&prefix_bytes(97, 21)).unwrap();
        assert_eq!(prefix.version, DBASE3_VERSION);
        assert_eq!(prefix.record_count, 3);
        assert_eq!(prefix.header_length, 97);
        assert_eq!(prefix.record_length, 21);
        assert_eq!(prefix.last_update, NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn test_parse_prefix_too_small() {
        assert!(parse_header_prefix(&[0u8; 10]).is_err());
        assert!(parse_header_prefix(&prefix_bytes(32, 10)).is_err());
    }

    #[test]
    fn test_build_and_parse_descriptor() {
        let field = FieldDescriptor::numeric("VAL_TOT", 12, 2);
        let bytes = build_field_descriptor(&field);
        let parsed = parse_field_descriptor(&bytes, 0).unwrap();
        assert_eq!(parsed, field);
    }

    #[test]
    fn test_parse_descriptor_unknown_tag() {
        let mut bytes = build_field_descriptor(&FieldDescriptor::character("X", 4));
        bytes[11] = b'Q';
        let err = parse_field_descriptor(&bytes, 2).unwrap_err();
        assert!(matches!(err, DbfError::InvalidField { index: 2, .. }));
    }

    #[test]
    fn test_parse_descriptor_zero_length() {
        let mut bytes = build_field_descriptor(&FieldDescriptor::character("X", 4));
        bytes[16] = 0;
        assert!(parse_field_descriptor(&bytes, 0).is_err());
    }

    #[test]
    fn test_parse_descriptor_bad_decimals() {
        let bytes = build_field_descriptor(&FieldDescriptor::numeric("N", 2, 2));
        assert!(parse_field_descriptor(&bytes, 0).is_err());
    }

    #[test]
    fn test_parse_descriptors_requires_terminator() {
        let block = build_field_descriptor(&FieldDescriptor::character("A", 1)).to_vec();
        let err = parse_field_descriptors(&block).unwrap_err();
        assert!(matches!(err, DbfError::InvalidHeader { .. }));
    }

    #[test]
    fn test_parse_descriptors_rejects_duplicates() {
        let mut block = Vec::new();
        block.extend_from_slice(&build_field_descriptor(&FieldDescriptor::character("A", 1)));
        block.extend_from_slice(&build_field_descriptor(&FieldDescriptor::character("A", 2)));
        block.push(HEADER_TERMINATOR);
        let err = parse_field_descriptors(&block).unwrap_err();
        assert!(matches!(err, DbfError::DuplicateField { name } if name == "A"));
    }

    #[test]
    fn test_validate_layout() {
        let fields = vec![
            FieldDescriptor::character("A", 4),
            FieldDescriptor::numeric("B", 6, 2),
        ];
        let good = parse_header_prefix(&prefix_bytes(97, 11)).unwrap();
        assert!(validate_layout(&good, &fields).is_ok());

        let bad_header = parse_header_prefix(&prefix_bytes(129, 11)).unwrap();
        assert!(matches!(
            validate_layout(&bad_header, &fields),
            Err(DbfError::HeaderLengthMismatch { expected: 97, actual: 129, .. })
        ));

        let bad_record = parse_header_prefix(&prefix_bytes(97, 12)).unwrap();
        assert!(matches!(
            validate_layout(&bad_record, &fields),
            Err(DbfError::RecordLengthMismatch { expected: 11, actual: 12 })
        ));
    }

    #[test]
    fn test_foxpro_header_length() {
        assert_eq!(expected_header_length(DBASE3_VERSION, 2), 97);
        assert_eq!(expected_header_length(0x30, 2), 97 + FOXPRO_BACKLINK_LEN);
    }
}
