//! DBF writer.
//!
//! Builds well-formed dBase III tables in memory. The pipeline never writes
//! DBF output; the writer exists to produce fixtures with exact control over
//! deletion flags and field padding.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;
use encoding_rs::Encoding;

use sih_common::{DEFAULT_SOURCE_ENCODING, encode_single_byte};

use crate::error::{DbfError, Result};
use crate::header::{
    ACTIVE_FLAG, DBASE3_VERSION, DELETED_FLAG, END_OF_FILE, MAX_FIELD_NAME_LEN, TableHeader,
    build_header, expected_header_length, expected_record_length,
};
use crate::types::FieldDescriptor;

/// In-memory DBF table builder.
#[derive(Debug, Clone)]
pub struct DbfWriter {
    fields: Vec<FieldDescriptor>,
    records: Vec<Vec<u8>>,
    encoding: &'static Encoding,
    last_update: Option<NaiveDate>,
}

impl DbfWriter {
    /// Create a writer for the given field layout.
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self> {
        if fields.is_empty() {
            return Err(DbfError::invalid_header("table declares no fields"));
        }
        let mut seen = BTreeSet::new();
        for (index, field) in fields.iter().enumerate() {
            if field.name.is_empty() || !field.name.is_ascii() {
                return Err(DbfError::invalid_field(index, "field name must be ASCII"));
            }
            if field.name.len() > MAX_FIELD_NAME_LEN {
                return Err(DbfError::invalid_field(
                    index,
                    format!("field name '{}' exceeds {MAX_FIELD_NAME_LEN} characters", field.name),
                ));
            }
            if field.length == 0 {
                return Err(DbfError::invalid_field(
                    index,
                    format!("field {} has zero length", field.name),
                ));
            }
            if !seen.insert(field.name.clone()) {
                return Err(DbfError::duplicate_field(field.name.clone()));
            }
        }
        if expected_record_length(&fields) > usize::from(u16::MAX) {
            return Err(DbfError::invalid_header("record length exceeds 65535 bytes"));
        }
        Ok(Self {
            fields,
            records: Vec::new(),
            encoding: DEFAULT_SOURCE_ENCODING,
            last_update: None,
        })
    }

    /// Set the character field encoding.
    #[must_use]
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the last-update date stored in the header.
    #[must_use]
    pub fn with_last_update(mut self, date: NaiveDate) -> Self {
        self.last_update = Some(date);
        self
    }

    /// Append an active record. Values are raw field text.
    pub fn push_record(&mut self, values: &[&str]) -> Result<()> {
        let record = self.encode_record(ACTIVE_FLAG, values)?;
        self.records.push(record);
        Ok(())
    }

    /// Append a record whose deletion flag is set.
    pub fn push_deleted_record(&mut self, values: &[&str]) -> Result<()> {
        let record = self.encode_record(DELETED_FLAG, values)?;
        self.records.push(record);
        Ok(())
    }

    /// Number of physical records, deleted ones included.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Serialize header, records and end-of-file marker.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = self.header();
        let mut buf = build_header(&header);
        for record in &self.records {
            buf.extend_from_slice(record);
        }
        buf.push(END_OF_FILE);
        buf
    }

    /// Write the table to any writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Write the table to a file.
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }

    fn header(&self) -> TableHeader {
        TableHeader {
            version: DBASE3_VERSION,
            last_update: self.last_update,
            record_count: u32::try_from(self.records.len()).unwrap_or(u32::MAX),
            header_length: u16::try_from(expected_header_length(DBASE3_VERSION, self.fields.len()))
                .unwrap_or(u16::MAX),
            record_length: u16::try_from(expected_record_length(&self.fields))
                .unwrap_or(u16::MAX),
            fields: self.fields.clone(),
        }
    }

    fn encode_record(&self, flag: u8, values: &[&str]) -> Result<Vec<u8>> {
        if values.len() != self.fields.len() {
            return Err(DbfError::RowLengthMismatch {
                expected: self.fields.len(),
                actual: values.len(),
            });
        }
        let mut record = Vec::with_capacity(expected_record_length(&self.fields));
        record.push(flag);
        for (field, value) in self.fields.iter().zip(values) {
            let width = usize::from(field.length);
            let mut bytes = encode_single_byte(value, self.encoding);
            bytes.truncate(width);
            let padding = width - bytes.len();
            if field.field_type.is_numeric() {
                record.resize(record.len() + padding, b' ');
                record.extend_from_slice(&bytes);
            } else {
                record.extend_from_slice(&bytes);
                record.resize(record.len() + padding, b' ');
            }
        }
        Ok(record)
    }
}
