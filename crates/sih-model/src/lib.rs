//! SIH data model definitions.
//!
//! Plain data shared by every stage: the canonical schema, code to label
//! lookup tables, the typed working table and per-file pipeline results.
//! Nothing here does I/O.

pub mod error;
pub mod lookup;
pub mod result;
pub mod schema;
pub mod table;

pub use error::{ModelError, Result};
pub use lookup::{LookupKind, LookupTable, LookupTables};
pub use result::{BatchSummary, FileStage, PipelineResult};
pub use schema::{CanonicalField, CanonicalSchema, FieldRole, TargetType};
pub use table::{CellValue, Table};
