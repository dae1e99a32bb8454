//! Integration tests for reading DBF tables from disk.

use std::fs;

use chrono::NaiveDate;
use sih_dbf::{
    DbfError, DbfReader, DbfReaderOptions, DbfValue, DbfWriter, FieldDescriptor, FieldType,
    read_dbf, read_dbf_with_options,
};
use tempfile::TempDir;

fn admissions() -> DbfWriter {
    let mut writer = DbfWriter::new(vec![
        FieldDescriptor::character("N_AIH", 13),
        FieldDescriptor::date("DT_INTER"),
        FieldDescriptor::numeric("VAL_TOT", 10, 2),
        FieldDescriptor::character("MUNIC_RES", 6),
        FieldDescriptor::logical("MORTE"),
    ])
    .unwrap()
    .with_last_update(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    writer
        .push_record(&["3524100000011", "20240105", "1234.56", "355030", "F"])
        .unwrap();
    writer
        .push_deleted_record(&["3524100000012", "20240106", "99.00", "355030", "F"])
        .unwrap();
    writer
        .push_record(&["3524100000013", "20240231", "abc", "", "T"])
        .unwrap();
    writer
}

#[test]
fn test_read_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("RDSP2401.dbf");
    admissions().write_to_path(&path).unwrap();

    let table = read_dbf(&path).unwrap();
    assert_eq!(table.header.version, 0x03);
    assert_eq!(
        table.header.last_update,
        NaiveDate::from_ymd_opt(2024, 3, 1)
    );
    assert_eq!(table.header.record_count, 3);
    assert_eq!(table.deleted_count, 1);
    assert_eq!(table.num_rows(), 2);
    assert_eq!(
        table.header.field_names(),
        vec!["N_AIH", "DT_INTER", "VAL_TOT", "MUNIC_RES", "MORTE"]
    );
    assert_eq!(
        table.header.field("VAL_TOT").map(|f| f.field_type),
        Some(FieldType::Numeric)
    );

    let first = &table.rows[0];
    assert_eq!(
        first.get("N_AIH"),
        Some(&DbfValue::character("3524100000011"))
    );
    assert_eq!(
        first.get("DT_INTER"),
        Some(&DbfValue::Date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()))
    );
    assert_eq!(
        first.get("VAL_TOT"),
        Some(&DbfValue::Decimal {
            value: 1234.56,
            scale: 2
        })
    );
    assert_eq!(first.get("MORTE"), Some(&DbfValue::Logical(false)));
}

#[test]
fn test_bad_values_decode_to_null() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.dbf");
    admissions().write_to_path(&path).unwrap();

    let table = read_dbf(&path).unwrap();
    let row = &table.rows[1];
    // February 31st is not a date.
    assert_eq!(row.get("DT_INTER"), Some(&DbfValue::Null));
    assert_eq!(row.get("VAL_TOT"), Some(&DbfValue::Null));
    assert_eq!(row.get("MUNIC_RES"), Some(&DbfValue::character("")));
    assert_eq!(row.get("MORTE"), Some(&DbfValue::Logical(true)));
}

#[test]
fn test_latin1_text() {
    let mut writer = DbfWriter::new(vec![FieldDescriptor::character("NOME", 12)]).unwrap();
    writer.push_record(&["São Paulo"]).unwrap();
    let bytes = writer.to_bytes();
    // One byte per character in the stored record.
    assert!(bytes.windows(9).any(|w| w == b"S\xe3o Paulo"));

    let table = DbfReader::new(std::io::Cursor::new(bytes))
        .unwrap()
        .read_table()
        .unwrap();
    assert_eq!(
        table.rows[0].get("NOME"),
        Some(&DbfValue::character("São Paulo"))
    );
}

#[test]
fn test_explicit_encoding() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("utf8.dbf");
    let mut writer = DbfWriter::new(vec![FieldDescriptor::character("NOME", 12)])
        .unwrap()
        .with_encoding(encoding_rs::UTF_8);
    writer.push_record(&["Ribeirão"]).unwrap();
    writer.write_to_path(&path).unwrap();

    let options = DbfReaderOptions::new().with_encoding(encoding_rs::UTF_8);
    let table = read_dbf_with_options(&path, options).unwrap();
    assert_eq!(
        table.rows[0].get("NOME"),
        Some(&DbfValue::character("Ribeirão"))
    );
}

#[test]
fn test_header_length_mismatch() {
    let mut bytes = admissions().to_bytes();
    // Declare a header one descriptor longer than the descriptor block.
    let declared = u16::from_le_bytes([bytes[8], bytes[9]]) + 32;
    bytes[8..10].copy_from_slice(&declared.to_le_bytes());

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.dbf");
    fs::write(&path, &bytes).unwrap();

    let err = read_dbf(&path).unwrap_err();
    assert!(
        matches!(
            err,
            DbfError::HeaderLengthMismatch { .. } | DbfError::InvalidHeader { .. }
        ),
        "unexpected error: {err}"
    );
}

#[test]
fn test_not_a_dbf() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.dbf");
    fs::write(&path, b"this is plain text").unwrap();
    assert!(matches!(
        read_dbf(&path),
        Err(DbfError::InvalidHeader { .. })
    ));
}

#[test]
fn test_empty_table() {
    let writer = DbfWriter::new(vec![FieldDescriptor::character("A", 1)]).unwrap();
    let table = DbfReader::new(std::io::Cursor::new(writer.to_bytes()))
        .unwrap()
        .read_table()
        .unwrap();
    assert_eq!(table.num_rows(), 0);
    assert_eq!(table.deleted_count, 0);
}
