//! Column projection against the canonical schema.

use std::collections::BTreeSet;

use sih_model::CanonicalSchema;

use crate::error::{Result, TransformError};

/// Canonical fields split by presence in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// Present fields, in schema order.
    pub kept: Vec<String>,
    /// Absent fields, in schema order.
    pub missing: Vec<String>,
}

/// Intersects the available field names with the schema.
///
/// Missing fields are not an error; an empty intersection is.
pub fn project<S: AsRef<str>>(available: &[S], schema: &CanonicalSchema) -> Result<Projection> {
    let available: BTreeSet<&str> = available.iter().map(AsRef::as_ref).collect();
    let (kept, missing): (Vec<&str>, Vec<&str>) =
        schema.names().partition(|name| available.contains(name));
    if kept.is_empty() {
        return Err(TransformError::SchemaMismatch {
            expected: schema.names().map(str::to_string).collect(),
        });
    }
    Ok(Projection {
        kept: kept.into_iter().map(str::to_string).collect(),
        missing: missing.into_iter().map(str::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use sih_model::{CanonicalField, FieldRole, TargetType};

    use super::*;

    fn schema() -> CanonicalSchema {
        CanonicalSchema::new(vec![
            CanonicalField::new("VAL_TOT", "Valor Total", FieldRole::Metric, TargetType::Currency),
            CanonicalField::new("IDADE", "Idade", FieldRole::Dimension, TargetType::Integer),
        ])
        .unwrap()
    }

    #[test]
    fn test_kept_and_missing() {
        let projection = project(&["A", "VAL_TOT", "X"], &schema()).unwrap();
        assert_eq!(projection.kept, vec!["VAL_TOT"]);
        assert_eq!(projection.missing, vec!["IDADE"]);
    }

    #[test]
    fn test_schema_order_wins() {
        let projection = project(&["IDADE", "VAL_TOT"], &schema()).unwrap();
        assert_eq!(projection.kept, vec!["VAL_TOT", "IDADE"]);
        assert!(projection.missing.is_empty());
    }

    #[test]
    fn test_disjoint_is_mismatch() {
        let err = project(&["A", "B"], &schema()).unwrap_err();
        assert!(matches!(err, TransformError::SchemaMismatch { expected } if expected.len() == 2));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!(project(&["val_tot"], &schema()).is_err());
    }
}
