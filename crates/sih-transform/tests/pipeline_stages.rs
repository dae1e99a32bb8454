//! Projection, coercion and enrichment against the canonical SIH schema.

use std::io::Cursor;

use sih_dbf::{DbfReader, DbfWriter, FieldDescriptor};
use sih_model::CellValue;
use sih_standards::{sih_schema, static_lookup_tables};
use sih_transform::{apply_enrichment, build_table, coerce_table, project};

#[test]
fn decoded_rows_flow_through_every_stage() {
    let mut writer = DbfWriter::new(vec![
        FieldDescriptor::character("UF_ZI", 6),
        FieldDescriptor::numeric("VAL_TOT", 12, 2),
        FieldDescriptor::date("DT_INTER"),
        FieldDescriptor::numeric("IDADE", 3, 0),
        FieldDescriptor::character("COBRANCA", 2),
        FieldDescriptor::character("RACA_COR", 2),
    ])
    .unwrap();
    writer
        .push_record(&["355030", "1234.56", "20240115", "34", "11", "05"])
        .unwrap();
    writer
        .push_record(&["355030", "", "        ", "", "99", "01"])
        .unwrap();
    let decoded = DbfReader::new(Cursor::new(writer.to_bytes()))
        .unwrap()
        .read_table()
        .unwrap();

    let schema = sih_schema().unwrap();
    let projection = project(&decoded.header.field_names(), &schema).unwrap();
    assert_eq!(
        projection.kept,
        vec!["VAL_TOT", "DT_INTER", "COBRANCA", "IDADE", "RACA_COR"]
    );
    assert_eq!(projection.missing.len(), 29);

    let mut table =
        build_table(&decoded.header.field_names(), &decoded.rows, &projection.kept).unwrap();
    let coercion = coerce_table(&mut table, &schema).unwrap();
    assert_eq!(coercion.total(), 0);
    let enrichment = apply_enrichment(&mut table, &schema, &static_lookup_tables()).unwrap();

    assert_eq!(table.cell(0, "VAL_TOT"), Some(&CellValue::Currency(1234.56)));
    assert_eq!(table.cell(0, "IDADE"), Some(&CellValue::Integer(34)));
    assert_eq!(table.cell(0, "COBRANCA"), Some(&CellValue::text("Alta curado")));
    assert_eq!(table.cell(0, "RACA_COR"), Some(&CellValue::text("Indígena")));
    assert_eq!(table.cell(1, "COBRANCA"), Some(&CellValue::Missing));
    assert_eq!(table.cell(1, "RACA_COR"), Some(&CellValue::text("Branca")));
    assert_eq!(table.cell(1, "DT_INTER"), Some(&CellValue::Missing));
    assert_eq!(enrichment.unmatched.get("COBRANCA"), Some(&1));
}
