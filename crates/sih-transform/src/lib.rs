//! SIH data transformation.
//!
//! - **projection**: intersect decoded fields with the canonical schema
//! - **frame**: build the working table from decoded rows
//! - **normalization**: currency, date and integer normalizers
//! - **coerce**: apply the normalizers to typed columns
//! - **enrich**: encoding repair and code-to-label substitution

pub mod coerce;
pub mod enrich;
pub mod error;
pub mod frame;
pub mod normalization;
pub mod projection;

pub use coerce::{CoercionReport, coerce_table};
pub use enrich::{EnrichmentReport, apply_enrichment, enrich_value, repair_table_text};
pub use error::{Result, TransformError};
pub use frame::build_table;
pub use normalization::{normalize_currency, normalize_date, normalize_integer};
pub use projection::{Projection, project};
