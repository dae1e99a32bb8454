//! Loader for the external ICD-10 subcategory table.
//!
//! The table is a delimited text file (the DATASUS distribution uses `;`)
//! with a `SUBCAT` code column and a `DESCRICAO` label column. Files without
//! those headers are read positionally: first column code, second label.

use std::path::{Path, PathBuf};

use csv::{ByteRecord, ReaderBuilder};
use tracing::{debug, warn};

use sih_common::{DEFAULT_SOURCE_ENCODING, decode_single_byte, repair_text};
use sih_model::LookupTable;

use crate::error::{Result, StandardsError};

/// Environment variable naming the default diagnosis table.
pub const DIAGNOSIS_ENV_VAR: &str = "SIH_DIAGNOSIS_TABLE";

/// The diagnosis table configured through the environment, if any.
pub fn default_diagnosis_path() -> Option<PathBuf> {
    std::env::var_os(DIAGNOSIS_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Layout of a diagnosis table file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisSource {
    pub delimiter: u8,
    pub code_column: String,
    pub description_column: String,
}

impl Default for DiagnosisSource {
    fn default() -> Self {
        Self {
            delimiter: b';',
            code_column: "SUBCAT".to_string(),
            description_column: "DESCRICAO".to_string(),
        }
    }
}

impl DiagnosisSource {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Loads the diagnosis table into a lookup table.
///
/// Fields are UTF-8; a field that is not valid UTF-8 is decoded as
/// Windows-1252. Codes and labels are trimmed and labels go through
/// [`repair_text`]. Rows with an empty code are skipped.
pub fn load_diagnosis_table(path: &Path, source: &DiagnosisSource) -> Result<LookupTable> {
    let file = std::fs::File::open(path).map_err(|e| StandardsError::io(path, e))?;
    let mut reader = ReaderBuilder::new()
        .delimiter(source.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(|e| StandardsError::csv(path, &e))?
        .iter()
        .map(|field| decode_field(field).trim_matches('\u{feff}').trim().to_string())
        .collect();
    if headers.len() < 2 {
        return Err(StandardsError::TooFewColumns {
            path: path.to_path_buf(),
            found: headers.len(),
        });
    }
    let (code_index, label_index) = resolve_columns(&headers, source, path);

    let mut table = LookupTable::new("diagnostico");
    let mut record = ByteRecord::new();
    let mut skipped = 0usize;
    while reader
        .read_byte_record(&mut record)
        .map_err(|e| StandardsError::csv(path, &e))?
    {
        let code = record.get(code_index).map(decode_field).unwrap_or_default();
        let code = code.trim();
        if code.is_empty() {
            skipped += 1;
            continue;
        }
        let label = record.get(label_index).map(decode_field).unwrap_or_default();
        table.insert(code, &repair_text(label.trim()));
    }

    if table.is_empty() {
        return Err(StandardsError::Empty {
            path: path.to_path_buf(),
        });
    }
    debug!(
        path = %path.display(),
        entries = table.len(),
        skipped,
        "loaded diagnosis table"
    );
    Ok(table)
}

fn resolve_columns(headers: &[String], source: &DiagnosisSource, path: &Path) -> (usize, usize) {
    let find = |name: &str| {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
    };
    match (find(&source.code_column), find(&source.description_column)) {
        (Some(code), Some(label)) => (code, label),
        _ => {
            warn!(
                path = %path.display(),
                code_column = %source.code_column,
                description_column = %source.description_column,
                "diagnosis headers not found, using the first two columns"
            );
            (0, 1)
        }
    }
}

fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => decode_single_byte(bytes, DEFAULT_SOURCE_ENCODING),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_named_columns() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "CID-10-SUBCATEGORIAS.CSV",
            "SUBCAT;CLASSIF;DESCRICAO;RESTRSEXO\nA000;;Cólera devida a Vibrio cholerae 01, biótipo cholerae;\nA001;;CÃ³lera devida a Vibrio cholerae 01, biÃ³tipo El Tor;\n"
                .as_bytes(),
        );
        let table = load_diagnosis_table(&path, &DiagnosisSource::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.lookup("A000"),
            Some("Cólera devida a Vibrio cholerae 01, biótipo cholerae")
        );
        // Mojibake in the source file is repaired.
        assert_eq!(
            table.lookup("A001"),
            Some("Cólera devida a Vibrio cholerae 01, biótipo El Tor")
        );
    }

    #[test]
    fn test_positional_fallback() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cid.csv", b"code,label\nJ18,Pneumonia\n\n,orphan\n");
        let source = DiagnosisSource::default().with_delimiter(b',');
        let table = load_diagnosis_table(&path, &source).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("j18"), Some("Pneumonia"));
    }

    #[test]
    fn test_latin1_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cid.csv", b"SUBCAT;DESCRICAO\nA00;C\xf3lera\n");
        let table = load_diagnosis_table(&path, &DiagnosisSource::default()).unwrap();
        assert_eq!(table.lookup("A00"), Some("Cólera"));
    }

    #[test]
    fn test_rejects_single_column() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cid.csv", b"SUBCAT\nA00\n");
        assert!(matches!(
            load_diagnosis_table(&path, &DiagnosisSource::default()),
            Err(StandardsError::TooFewColumns { found: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_empty_table() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cid.csv", b"SUBCAT;DESCRICAO\n");
        assert!(matches!(
            load_diagnosis_table(&path, &DiagnosisSource::default()),
            Err(StandardsError::Empty { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = load_diagnosis_table(
            Path::new("/definitely/not/here.csv"),
            &DiagnosisSource::default(),
        );
        assert!(matches!(result, Err(StandardsError::Io { .. })));
    }
}
