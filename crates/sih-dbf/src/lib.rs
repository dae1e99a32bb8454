//! dBase (DBF) table reader.
//!
//! DATASUS publishes hospital admission (SIH/AIH) microdata as dBase III
//! tables. This crate decodes the header and field descriptors and then
//! yields one row per non-deleted record.
//!
//! # Features
//!
//! - Header and descriptor validation (lengths, terminator, duplicate names)
//! - Lazy, single-pass record iteration with deleted-record skipping
//! - Configurable single-byte text encoding via `encoding_rs`
//! - Value-level tolerance: unparseable fields decode to [`DbfValue::Null`]
//! - A small writer for building fixture tables
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use sih_dbf::{DbfReader, DbfValue};
//!
//! let reader = DbfReader::open(Path::new("RDSP2401.dbf")).unwrap();
//! println!("{} records", reader.header().record_count);
//! for row in reader {
//!     let row = row.unwrap();
//!     if let Some(DbfValue::Character(aih)) = row.get("N_AIH") {
//!         println!("{aih}");
//!     }
//! }
//! ```

pub mod decode;
mod error;
pub mod header;
mod reader;
mod types;
mod writer;

// Re-export error types
pub use error::{DbfError, Result};

// Re-export core types
pub use header::TableHeader;
pub use types::{DbfReaderOptions, DbfValue, FieldDescriptor, FieldType, Row};

// Re-export reader functionality
pub use reader::{DbfReader, DbfTable, read_dbf, read_dbf_with_options};

// Re-export writer functionality
pub use writer::DbfWriter;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
