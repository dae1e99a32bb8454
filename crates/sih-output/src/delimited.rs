//! Delimited-text output.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use sih_model::{CellValue, Table};

use crate::error::{OutputError, Result};

/// Options for delimited output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOutputOptions {
    pub delimiter: u8,
}

impl Default for CsvOutputOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvOutputOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Output path for a source file: `<output_dir>/<source stem>.csv`.
pub fn output_path(output_dir: &Path, source: &Path) -> Result<PathBuf> {
    let stem = source
        .file_stem()
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| OutputError::InvalidSource {
            path: source.to_path_buf(),
        })?;
    let mut name = stem.to_os_string();
    name.push(".csv");
    Ok(output_dir.join(name))
}

/// Output paths for a batch, in input order.
///
/// Names are compared case-insensitively. When two sources map to the same
/// file, the first keeps it and every later one gets
/// [`OutputError::OutputCollision`].
pub fn assign_output_paths(output_dir: &Path, sources: &[PathBuf]) -> Vec<Result<PathBuf>> {
    let mut claimed: HashMap<String, &Path> = HashMap::new();
    sources
        .iter()
        .map(|source| {
            let output = output_path(output_dir, source)?;
            let key = output.to_string_lossy().to_lowercase();
            match claimed.get(&key) {
                Some(first) => Err(OutputError::OutputCollision {
                    input: source.clone(),
                    output,
                    first: first.to_path_buf(),
                }),
                None => {
                    claimed.insert(key, source.as_path());
                    Ok(output)
                }
            }
        })
        .collect()
}

/// Renders one cell: currency with two decimals, ISO dates, integers as
/// digits, text as-is and missing as empty.
pub fn format_cell(cell: &CellValue) -> Cow<'_, str> {
    match cell {
        CellValue::Text(text) => Cow::Borrowed(text),
        CellValue::Currency(value) => Cow::Owned(format!("{value:.2}")),
        CellValue::Date(date) => Cow::Owned(date.format("%Y-%m-%d").to_string()),
        CellValue::Integer(value) => Cow::Owned(value.to_string()),
        CellValue::Missing => Cow::Borrowed(""),
    }
}

/// Writes the header and rows of a table to any writer.
pub fn write_table<W: Write>(writer: W, table: &Table, options: &CsvOutputOptions) -> csv::Result<()> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);
    out.write_record(&table.columns)?;
    for row in &table.rows {
        out.write_record(row.iter().map(|cell| format_cell(cell).into_owned()))?;
    }
    out.flush()?;
    Ok(())
}

/// Writes a table to `path` as UTF-8 CSV.
///
/// The file is written next to the target and renamed into place, so a
/// failed write never leaves a partial output behind.
pub fn write_table_csv(path: &Path, table: &Table, options: &CsvOutputOptions) -> Result<()> {
    ensure_parent_dir(path)?;
    let temp_path = path.with_extension("csv.tmp");

    let file = File::create(&temp_path).map_err(|e| OutputError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;
    if let Err(source) = write_table(&file, table, options) {
        let _ = fs::remove_file(&temp_path);
        return Err(OutputError::Csv {
            path: path.to_path_buf(),
            source,
        });
    }
    file.sync_all().map_err(|e| OutputError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| OutputError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(
        path = %path.display(),
        rows = table.num_rows(),
        columns = table.num_columns(),
        "wrote csv"
    );
    Ok(())
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| OutputError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}
