use sih_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("none of the {} canonical fields are present in the input", expected.len())]
    SchemaMismatch { expected: Vec<String> },
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
