//! Lookup enrichment: encoding repair followed by code substitution.

use std::borrow::Cow;
use std::collections::BTreeMap;

use sih_common::repair_text;
use sih_model::{CanonicalSchema, CellValue, LookupKind, LookupTable, LookupTables, Table};
use tracing::{debug, info, warn};

use crate::error::Result;

/// Outcome of enriching one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    /// Cells whose text was changed by encoding repair.
    pub repaired: usize,
    /// Codes without a label, per column.
    pub unmatched: BTreeMap<String, usize>,
    /// Coded columns left as raw codes because their table is not loaded.
    pub skipped: Vec<String>,
}

/// Repairs mis-decoded text in every text cell. Returns the number of cells
/// that changed.
pub fn repair_table_text(table: &mut Table) -> usize {
    let mut repaired = 0;
    for cell in table.cells_mut() {
        let CellValue::Text(text) = cell else {
            continue;
        };
        let fixed = match repair_text(text) {
            Cow::Owned(fixed) => fixed,
            Cow::Borrowed(_) => continue,
        };
        *text = fixed;
        repaired += 1;
    }
    repaired
}

/// Resolves one coded value to its label. Unknown or blank codes are missing.
pub fn enrich_value(raw: &CellValue, table: &LookupTable) -> CellValue {
    let label = match raw {
        CellValue::Text(code) => table.lookup(code),
        CellValue::Integer(code) => table.lookup_code(*code),
        _ => None,
    };
    label.map_or(CellValue::Missing, CellValue::text)
}

/// Repairs text, then substitutes labels for every coded column present in
/// the table.
pub fn apply_enrichment(
    table: &mut Table,
    schema: &CanonicalSchema,
    lookups: &LookupTables,
) -> Result<EnrichmentReport> {
    let mut report = EnrichmentReport {
        repaired: repair_table_text(table),
        ..EnrichmentReport::default()
    };
    if report.repaired > 0 {
        debug!(cells = report.repaired, "repaired mis-decoded text");
    }

    let coded: Vec<(String, LookupKind)> = schema
        .coded_fields()
        .filter(|(field, _)| table.column_index(&field.name).is_some())
        .map(|(field, kind)| (field.name.clone(), kind))
        .collect();

    for (column, kind) in coded {
        let Some(lookup) = lookups.get(kind) else {
            warn!(column = %column, lookup = %kind, "lookup table not loaded, codes kept");
            report.skipped.push(column);
            continue;
        };

        let mut unmatched = 0usize;
        table.map_column(&column, |cell| {
            let enriched = enrich_value(cell, lookup);
            if enriched.is_missing() && !is_blank(cell) {
                unmatched += 1;
            }
            enriched
        })?;

        if unmatched > 0 {
            info!(column = %column, lookup = %kind, unmatched, "codes without a label");
        }
        report.unmatched.insert(column, unmatched);
    }
    Ok(report)
}

fn is_blank(cell: &CellValue) -> bool {
    match cell {
        CellValue::Text(text) => text.trim().is_empty(),
        CellValue::Missing => true,
        _ => false,
    }
}
