//! Errors raised when building schemas and tables.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("schema declares no fields")]
    EmptySchema,
    #[error("duplicate schema field: {name}")]
    DuplicateField { name: String },
    #[error("row has {actual} cells, table has {expected} columns")]
    RowWidth { expected: usize, actual: usize },
    #[error("unknown column: {name}")]
    UnknownColumn { name: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
