//! Error types for DBF decoding.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading or writing DBF files.
#[derive(Debug, Error)]
pub enum DbfError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Header record is malformed.
    #[error("invalid DBF header: {message}")]
    InvalidHeader { message: String },

    /// Header length does not match the number of field descriptors.
    #[error("header length mismatch: {field_count} fields need {expected} bytes, header declares {actual}")]
    HeaderLengthMismatch {
        field_count: usize,
        expected: usize,
        actual: usize,
    },

    /// Field descriptor is malformed.
    #[error("invalid field descriptor at index {index}: {message}")]
    InvalidField { index: usize, message: String },

    /// Duplicate field name.
    #[error("duplicate field name: {name}")]
    DuplicateField { name: String },

    /// Record length does not match the field layout.
    #[error("record length mismatch: fields need {expected} bytes, header declares {actual}")]
    RecordLengthMismatch { expected: usize, actual: usize },

    /// Byte stream ended inside a record.
    #[error("truncated record {record} of {declared}")]
    Truncated { record: u32, declared: u32 },

    /// Row value count does not match the field layout (writer).
    #[error("row length mismatch: expected {expected} values, got {actual}")]
    RowLengthMismatch { expected: usize, actual: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for DBF operations.
pub type Result<T> = std::result::Result<T, DbfError>;

impl DbfError {
    /// Create an InvalidHeader error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create an InvalidField error.
    pub fn invalid_field(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidField {
            index,
            message: message.into(),
        }
    }

    /// Create a DuplicateField error.
    pub fn duplicate_field(name: impl Into<String>) -> Self {
        Self::DuplicateField { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DbfError::invalid_header("file too small");
        assert_eq!(format!("{err}"), "invalid DBF header: file too small");

        let err = DbfError::Truncated {
            record: 3,
            declared: 10,
        };
        assert_eq!(format!("{err}"), "truncated record 3 of 10");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "test");
        let dbf_err: DbfError = io_err.into();
        assert!(matches!(dbf_err, DbfError::Io(_)));
    }
}
