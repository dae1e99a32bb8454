//! Reference data for SIH admission records.
//!
//! - [`canonical`]: the fixed, ordered list of output fields
//! - [`dictionaries`]: discharge motive, race and education code tables
//! - [`diagnosis`]: loader for the external ICD-10 subcategory table

#![deny(unsafe_code)]

pub mod canonical;
pub mod diagnosis;
pub mod dictionaries;
pub mod error;

pub use crate::canonical::{SIH_FIELDS, sih_schema};
pub use crate::diagnosis::{
    DIAGNOSIS_ENV_VAR, DiagnosisSource, default_diagnosis_path, load_diagnosis_table,
};
pub use crate::dictionaries::static_lookup_tables;
pub use crate::error::{Result, StandardsError};
