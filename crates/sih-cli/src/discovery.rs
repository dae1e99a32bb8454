//! Input discovery.

use std::path::{Path, PathBuf};

use crate::error::DiscoveryError;

/// Resolves the command-line inputs into a list of DBF files.
///
/// Files are taken as given. Directories contribute their `.dbf` files
/// (extension matched case-insensitively, no recursion), sorted by name.
/// Duplicates are dropped, first occurrence wins.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(list_dbf_files(input)?);
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(DiscoveryError::InputNotFound {
                path: input.clone(),
            });
        }
    }
    let mut seen = std::collections::BTreeSet::new();
    files.retain(|path| seen.insert(path.clone()));
    Ok(files)
}

/// Lists the DBF files of a directory, sorted by file name.
pub fn list_dbf_files(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let entries = std::fs::read_dir(dir).map_err(|e| DiscoveryError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DiscoveryError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && is_dbf(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn is_dbf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dbf"))
}
