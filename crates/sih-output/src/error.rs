use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to move {temp_path} to {target_path}: {source}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{input} would overwrite {output}, already written for {first}")]
    OutputCollision {
        input: PathBuf,
        output: PathBuf,
        first: PathBuf,
    },

    #[error("cannot derive an output name from {path}")]
    InvalidSource { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, OutputError>;
