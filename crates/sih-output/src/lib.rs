//! SIH output generation.
//!
//! Tables are written as UTF-8 delimited text, one file per input, with the
//! header holding the kept canonical columns in schema order.

mod delimited;
mod error;

pub use crate::delimited::{
    CsvOutputOptions, assign_output_paths, ensure_parent_dir, format_cell, output_path,
    write_table, write_table_csv,
};
pub use crate::error::{OutputError, Result};
