use std::fs;

use chrono::NaiveDate;
use sih_model::{CellValue, Table};
use sih_output::{CsvOutputOptions, output_path, write_table_csv};
use tempfile::TempDir;

fn admissions() -> Table {
    let mut table = Table::new(
        ["VAL_TOT", "DT_INTER", "IDADE", "COBRANCA"]
            .map(str::to_string)
            .to_vec(),
    );
    table
        .push_row(vec![
            CellValue::Currency(1234.56),
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
            CellValue::Integer(34),
            CellValue::text("Alta curado"),
        ])
        .unwrap();
    table
        .push_row(vec![
            CellValue::Missing,
            CellValue::Missing,
            CellValue::Integer(7),
            CellValue::text("Óbito com DO fornecida pelo IML"),
        ])
        .unwrap();
    table
}

#[test]
fn writes_utf8_csv_into_new_directory() {
    let dir = TempDir::new().unwrap();
    let out_dir = dir.path().join("nested").join("out");
    let path = output_path(&out_dir, "RDSP2401.dbf".as_ref()).unwrap();
    write_table_csv(&path, &admissions(), &CsvOutputOptions::default()).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    insta::assert_snapshot!(contents.trim_end(), @r"
    VAL_TOT,DT_INTER,IDADE,COBRANCA
    1234.56,2024-01-15,34,Alta curado
    ,,7,Óbito com DO fornecida pelo IML
    ");
    // No temporary file is left behind.
    let entries: Vec<_> = fs::read_dir(&out_dir).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn rewriting_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.csv");
    write_table_csv(&path, &admissions(), &CsvOutputOptions::default()).unwrap();
    let first = fs::read(&path).unwrap();
    write_table_csv(&path, &admissions(), &CsvOutputOptions::default()).unwrap();
    assert_eq!(first, fs::read(&path).unwrap());
}
