//! Lookup tables for a processing run.

use std::path::Path;

use tracing::info;

use sih_model::LookupTables;
use sih_standards::{DiagnosisSource, load_diagnosis_table, static_lookup_tables};

use crate::error::SetupError;

/// Static dictionaries plus the diagnosis table at `diagnosis`.
///
/// Enriched output resolves `DIAG_PRINC` like every other coded field, so a
/// run without a diagnosis table is refused rather than emitting raw codes.
pub fn load_lookups(
    diagnosis: Option<&Path>,
    source: &DiagnosisSource,
) -> Result<LookupTables, SetupError> {
    let path = diagnosis.ok_or(SetupError::DiagnosisNotConfigured)?;
    let table = load_diagnosis_table(path, source).map_err(|e| SetupError::Diagnosis {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(path = %path.display(), codes = table.len(), "diagnosis table loaded");
    Ok(static_lookup_tables().with_diagnosis(table))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use sih_model::LookupKind;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_missing_diagnosis_is_refused() {
        let err = load_lookups(None, &DiagnosisSource::default()).unwrap_err();
        assert!(matches!(err, SetupError::DiagnosisNotConfigured));
        assert!(err.to_string().contains("SIH_DIAGNOSIS_TABLE"));
    }

    #[test]
    fn test_unreadable_diagnosis_names_the_path() {
        let err = load_lookups(
            Some(Path::new("/definitely/not/cid10.csv")),
            &DiagnosisSource::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SetupError::Diagnosis { .. }));
        assert!(err.to_string().contains("/definitely/not/cid10.csv"));
    }

    #[test]
    fn test_loads_all_tables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cid10.csv");
        fs::write(&path, "SUBCAT;DESCRICAO\nA000;Cólera\n").unwrap();
        let lookups = load_lookups(Some(path.as_path()), &DiagnosisSource::default()).unwrap();
        assert!(lookups.has_diagnosis());
        let diagnosis = lookups.get(LookupKind::Diagnosis).unwrap();
        assert_eq!(diagnosis.lookup("A000"), Some("Cólera"));
    }
}
