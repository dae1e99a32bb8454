//! Code to label lookup tables.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The dictionaries a coded field can be resolved through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    /// Reason the patient left the hospital (`COBRANCA`).
    DischargeMotive,
    /// Self-declared race/colour (`RACA_COR`).
    Race,
    /// Education level (`INSTRU`).
    Education,
    /// ICD-10 subcategory (`DIAG_PRINC`), loaded from an external file.
    Diagnosis,
}

impl LookupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupKind::DischargeMotive => "discharge motive",
            LookupKind::Race => "race",
            LookupKind::Education => "education",
            LookupKind::Diagnosis => "diagnosis",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A code to label dictionary.
///
/// Lookups try an exact match first, then a case-insensitive match, then a
/// numeric-normalized match so `"01"`, `"1"`, `"1.0"` and `1` resolve to the
/// same entry.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    /// Name of the dictionary.
    pub name: String,
    /// Primary lookup: exact match.
    values: BTreeMap<String, String>,
    /// Case-insensitive lookup (uppercase keys).
    values_upper: BTreeMap<String, String>,
    /// Numeric-normalized lookup (e.g., "01" -> "1").
    values_numeric: BTreeMap<String, String>,
}

impl LookupTable {
    /// Creates a new empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builds a table from code-label pairs. Later pairs win on duplicate codes.
    pub fn from_pairs<'a>(
        name: impl Into<String>,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut table = Self::new(name);
        for (code, label) in pairs {
            table.insert(code, label);
        }
        table
    }

    /// Inserts a code-label pair.
    pub fn insert(&mut self, code: &str, label: &str) {
        let code = code.trim();
        self.values.insert(code.to_string(), label.to_string());
        self.values_upper
            .insert(code.to_uppercase(), label.to_string());
        if let Some(normalized) = normalize_numeric_key(code) {
            self.values_numeric.insert(normalized, label.to_string());
        }
    }

    /// Looks up the label for a raw code.
    pub fn lookup(&self, raw: &str) -> Option<&str> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        // Exact match
        if let Some(label) = self.values.get(raw) {
            return Some(label);
        }

        // Case-insensitive match
        if let Some(label) = self.values_upper.get(&raw.to_uppercase()) {
            return Some(label);
        }

        // Numeric-normalized match
        if let Some(normalized) = normalize_numeric_key(raw)
            && let Some(label) = self.values_numeric.get(&normalized)
        {
            return Some(label);
        }

        None
    }

    /// Looks up the label for an integer code.
    pub fn lookup_code(&self, code: i64) -> Option<&str> {
        self.values_numeric
            .get(&code.to_string())
            .map(String::as_str)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over all code-label pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(code, label)| (code.as_str(), label.as_str()))
    }
}

/// Canonical text for a numeric code: integral values without leading zeros
/// or a fractional part, other numbers in their shortest form.
fn normalize_numeric_key(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value.to_string());
    }
    let num: f64 = trimmed.parse().ok()?;
    if !num.is_finite() {
        return None;
    }
    if num.fract() == 0.0 && num.abs() < 9.0e15 {
        // Exact for integers below 2^53.
        return Some(format!("{}", num as i64));
    }
    Some(format!("{num}"))
}

/// The dictionaries used by enrichment, bundled for injection.
///
/// Read-only once built. The diagnosis table is optional because it comes
/// from an external file.
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    discharge_motive: LookupTable,
    race: LookupTable,
    education: LookupTable,
    diagnosis: Option<LookupTable>,
}

impl LookupTables {
    pub fn new(discharge_motive: LookupTable, race: LookupTable, education: LookupTable) -> Self {
        Self {
            discharge_motive,
            race,
            education,
            diagnosis: None,
        }
    }

    #[must_use]
    pub fn with_diagnosis(mut self, diagnosis: LookupTable) -> Self {
        self.diagnosis = Some(diagnosis);
        self
    }

    /// The table for a kind, `None` when it was never loaded.
    pub fn get(&self, kind: LookupKind) -> Option<&LookupTable> {
        match kind {
            LookupKind::DischargeMotive => Some(&self.discharge_motive),
            LookupKind::Race => Some(&self.race),
            LookupKind::Education => Some(&self.education),
            LookupKind::Diagnosis => self.diagnosis.as_ref(),
        }
    }

    pub fn has_diagnosis(&self) -> bool {
        self.diagnosis.is_some()
    }
}
