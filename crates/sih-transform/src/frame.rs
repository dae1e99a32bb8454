//! Building the working table from decoded rows.

use sih_dbf::{DbfValue, Row};
use sih_model::{CellValue, Table};

use crate::error::Result;

/// Builds a text table holding `columns` of every row.
///
/// `field_names` is the descriptor order shared by all rows. Columns absent
/// from it, and null values, become missing cells.
pub fn build_table(field_names: &[String], rows: &[Row], columns: &[String]) -> Result<Table> {
    let indices: Vec<Option<usize>> = columns
        .iter()
        .map(|column| field_names.iter().position(|name| name == column))
        .collect();

    let mut table = Table::new(columns.to_vec());
    table.rows.reserve(rows.len());
    for row in rows {
        let values = row.values();
        let cells = indices
            .iter()
            .map(|index| {
                index
                    .and_then(|index| values.get(index))
                    .map_or(CellValue::Missing, raw_cell)
            })
            .collect();
        table.push_row(cells)?;
    }
    Ok(table)
}

fn raw_cell(value: &DbfValue) -> CellValue {
    value
        .raw_text()
        .map_or(CellValue::Missing, |text| CellValue::Text(text.into_owned()))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use sih_dbf::{DbfReader, DbfWriter, FieldDescriptor};

    use super::*;

    #[test]
    fn test_build_projects_columns() {
        let mut writer = DbfWriter::new(vec![
            FieldDescriptor::character("CNES", 7),
            FieldDescriptor::numeric("VAL_TOT", 10, 2),
            FieldDescriptor::numeric("IDADE", 3, 0),
        ])
        .unwrap();
        writer.push_record(&["2077485", "1234.5", "34"]).unwrap();
        writer.push_record(&["2077485", "", "7"]).unwrap();
        let table = DbfReader::new(Cursor::new(writer.to_bytes()))
            .unwrap()
            .read_table()
            .unwrap();

        let columns = vec!["VAL_TOT".to_string(), "IDADE".to_string(), "NOPE".to_string()];
        let built = build_table(&table.header.field_names(), &table.rows, &columns).unwrap();
        assert_eq!(built.columns, columns);
        assert_eq!(built.cell(0, "VAL_TOT"), Some(&CellValue::text("1234.50")));
        assert_eq!(built.cell(0, "IDADE"), Some(&CellValue::text("34")));
        assert_eq!(built.cell(1, "VAL_TOT"), Some(&CellValue::Missing));
        assert_eq!(built.cell(1, "NOPE"), Some(&CellValue::Missing));
    }
}
