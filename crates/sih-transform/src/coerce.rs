//! Type coercion of projected columns.

use std::collections::BTreeMap;

use sih_model::{CanonicalSchema, CellValue, Table, TargetType};
use tracing::{debug, info};

use crate::error::Result;
use crate::normalization::{normalize_currency, normalize_date, normalize_integer};

/// Cells that held text but failed to coerce, per column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoercionReport {
    pub null_counts: BTreeMap<String, usize>,
}

impl CoercionReport {
    pub fn total(&self) -> usize {
        self.null_counts.values().sum()
    }
}

/// Coerces every currency, date and integer column of the table in place.
///
/// Failures never abort: the cell becomes missing and is counted.
pub fn coerce_table(table: &mut Table, schema: &CanonicalSchema) -> Result<CoercionReport> {
    let mut report = CoercionReport::default();
    let targets: Vec<(String, TargetType)> = table
        .columns
        .iter()
        .filter_map(|column| schema.get(column).map(|field| (column.clone(), field.target)))
        .collect();

    for (column, target) in targets {
        let coerce: fn(&str) -> Option<CellValue> = match target {
            TargetType::Currency => |raw| normalize_currency(Some(raw)).map(CellValue::Currency),
            TargetType::Date => |raw| normalize_date(Some(raw)).map(CellValue::Date),
            TargetType::Integer => |raw| normalize_integer(Some(raw)).map(CellValue::Integer),
            TargetType::Coded(_) | TargetType::Text => continue,
        };

        let mut failed = 0usize;
        table.map_column(&column, |cell| match cell {
            CellValue::Text(raw) if raw.trim().is_empty() => CellValue::Missing,
            CellValue::Text(raw) => coerce(raw).unwrap_or_else(|| {
                failed += 1;
                CellValue::Missing
            }),
            other => other.clone(),
        })?;

        if failed > 0 {
            info!(column = %column, target = %target, failed, "values could not be coerced");
        } else {
            debug!(column = %column, target = %target, "column coerced");
        }
        report.null_counts.insert(column, failed);
    }
    Ok(report)
}
