//! Core types for DBF tables: field descriptors, decoded values and rows.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use encoding_rs::Encoding;

use sih_common::DEFAULT_SOURCE_ENCODING;

/// Declared type of a DBF field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// `C`: fixed-width text.
    Character,
    /// `N`: ASCII number, integer or fixed decimal.
    Numeric,
    /// `F`: ASCII floating point, decoded like `Numeric`.
    Float,
    /// `D`: `YYYYMMDD` date.
    Date,
    /// `L`: single-byte boolean.
    Logical,
    /// `M`: pointer into a memo file.
    Memo,
}

impl FieldType {
    /// Parse a descriptor type tag.
    #[must_use]
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag.to_ascii_uppercase() {
            b'C' => Some(Self::Character),
            b'N' => Some(Self::Numeric),
            b'F' => Some(Self::Float),
            b'D' => Some(Self::Date),
            b'L' => Some(Self::Logical),
            b'M' => Some(Self::Memo),
            _ => None,
        }
    }

    /// The descriptor type tag.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Character => b'C',
            Self::Numeric => b'N',
            Self::Float => b'F',
            Self::Date => b'D',
            Self::Logical => b'L',
            Self::Memo => b'M',
        }
    }

    /// Whether values of this type are right-justified numbers.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Numeric | Self::Float)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Character => "Character",
            Self::Numeric => "Numeric",
            Self::Float => "Float",
            Self::Date => "Date",
            Self::Logical => "Logical",
            Self::Memo => "Memo",
        };
        write!(f, "{name}")
    }
}

/// One column of a DBF table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name, at most 10 ASCII characters.
    pub name: String,
    /// Declared type.
    pub field_type: FieldType,
    /// Width in bytes within a record.
    pub length: u8,
    /// Digits after the decimal point (numeric fields).
    pub decimal_count: u8,
}

impl FieldDescriptor {
    /// Create a descriptor.
    pub fn new(name: impl Into<String>, field_type: FieldType, length: u8, decimal_count: u8) -> Self {
        Self {
            name: name.into(),
            field_type,
            length,
            decimal_count,
        }
    }

    /// Character field of the given width.
    pub fn character(name: impl Into<String>, length: u8) -> Self {
        Self::new(name, FieldType::Character, length, 0)
    }

    /// Numeric field with the given width and decimal count.
    pub fn numeric(name: impl Into<String>, length: u8, decimal_count: u8) -> Self {
        Self::new(name, FieldType::Numeric, length, decimal_count)
    }

    /// Date field (always 8 bytes).
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date, 8, 0)
    }

    /// Logical field (always 1 byte).
    pub fn logical(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Logical, 1, 0)
    }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum DbfValue {
    /// Text with trailing padding removed.
    Character(String),
    /// Numeric field without decimals.
    Integer(i64),
    /// Numeric field with decimals; `scale` is the declared decimal count.
    Decimal { value: f64, scale: u8 },
    /// Calendar date.
    Date(NaiveDate),
    /// Boolean.
    Logical(bool),
    /// Blank or unparseable value.
    Null,
}

impl DbfValue {
    /// Create a character value.
    pub fn character(value: impl Into<String>) -> Self {
        Self::Character(value.into())
    }

    /// Check if this value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render the value as the text stored in the record.
    ///
    /// Decimals keep their declared scale so `1234.50` stays `1234.50`, and
    /// dates come back in the compact `YYYYMMDD` form.
    #[must_use]
    pub fn raw_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Character(text) => Some(Cow::Borrowed(text.as_str())),
            Self::Integer(value) => Some(Cow::Owned(value.to_string())),
            Self::Decimal { value, scale } => {
                Some(Cow::Owned(format!("{value:.prec$}", prec = usize::from(*scale))))
            }
            Self::Date(date) => Some(Cow::Owned(date.format("%Y%m%d").to_string())),
            Self::Logical(flag) => Some(Cow::Borrowed(if *flag { "T" } else { "F" })),
            Self::Null => None,
        }
    }
}

/// One non-deleted record: field names shared with the table, values in
/// descriptor order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    names: Arc<[String]>,
    values: Vec<DbfValue>,
}

impl Row {
    pub(crate) fn new(names: Arc<[String]>, values: Vec<DbfValue>) -> Self {
        debug_assert_eq!(names.len(), values.len());
        Self { names, values }
    }

    /// Value of the named field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DbfValue> {
        self.names
            .iter()
            .position(|field| field == name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Field names in descriptor order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Values in descriptor order.
    #[must_use]
    pub fn values(&self) -> &[DbfValue] {
        &self.values
    }

    /// Iterate `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DbfValue)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the table has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consume the row, returning its values.
    #[must_use]
    pub fn into_values(self) -> Vec<DbfValue> {
        self.values
    }
}

/// Options for reading DBF files.
#[derive(Debug, Clone, Copy)]
pub struct DbfReaderOptions {
    /// Code page of character fields (default: Windows-1252 / latin1).
    pub encoding: &'static Encoding,
}

impl Default for DbfReaderOptions {
    fn default() -> Self {
        Self {
            encoding: DEFAULT_SOURCE_ENCODING,
        }
    }
}

impl DbfReaderOptions {
    /// Create reader options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the character field encoding.
    #[must_use]
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_tags() {
        for ty in [
            FieldType::Character,
            FieldType::Numeric,
            FieldType::Float,
            FieldType::Date,
            FieldType::Logical,
            FieldType::Memo,
        ] {
            assert_eq!(FieldType::from_tag(ty.tag()), Some(ty));
        }
        assert_eq!(FieldType::from_tag(b'n'), Some(FieldType::Numeric));
        assert_eq!(FieldType::from_tag(b'X'), None);
    }

    #[test]
    fn test_raw_text() {
        let value = DbfValue::Decimal {
            value: 1234.5,
            scale: 2,
        };
        assert_eq!(value.raw_text().as_deref(), Some("1234.50"));
        assert_eq!(DbfValue::Integer(7).raw_text().as_deref(), Some("7"));
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(DbfValue::Date(date).raw_text().as_deref(), Some("20240115"));
        assert!(DbfValue::Null.raw_text().is_none());
    }

    #[test]
    fn test_row_lookup() {
        let names: Arc<[String]> = vec!["A".to_string(), "B".to_string()].into();
        let row = Row::new(
            names,
            vec![DbfValue::character("x"), DbfValue::Integer(2)],
        );
        assert_eq!(row.get("B"), Some(&DbfValue::Integer(2)));
        assert!(row.get("C").is_none());
        let pairs: Vec<_> = row.iter().map(|(name, _)| name).collect();
        assert_eq!(pairs, vec!["A", "B"]);
    }
}
