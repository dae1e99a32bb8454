use std::path::PathBuf;

use sih_dbf::DbfError;
use sih_output::OutputError;
use sih_standards::{DIAGNOSIS_ENV_VAR, StandardsError};
use sih_transform::TransformError;
use thiserror::Error;

/// Failure of one file. Captured into its result; never ends a batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DbfError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Failure to resolve the input list.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("input not found: {path}")]
    InputNotFound { path: PathBuf },
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to prepare a processing run.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no diagnosis table configured (pass --diagnosis or set {DIAGNOSIS_ENV_VAR})")]
    DiagnosisNotConfigured,
    #[error("failed to load diagnosis table {path}: {source}")]
    Diagnosis {
        path: PathBuf,
        #[source]
        source: StandardsError,
    },
}
