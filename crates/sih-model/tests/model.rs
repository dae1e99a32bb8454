//! Tests for sih-model types.

use std::path::PathBuf;

use sih_model::{BatchSummary, FileStage, LookupTable, PipelineResult};

fn emitted(name: &str, rows: usize) -> PipelineResult {
    let mut result = PipelineResult::pending(name);
    while result.stage != FileStage::Emitted {
        result.advance();
    }
    result.rows = rows;
    result.succeed(PathBuf::from("out").join(name));
    result
}

#[test]
fn batch_counts_successes_and_failures() {
    let mut failed = PipelineResult::pending("bad.dbf");
    failed.fail("header truncated");

    let summary = BatchSummary::from_results(vec![emitted("a.dbf", 2), failed, emitted("b.dbf", 3)]);
    assert_eq!(summary.successes, 2);
    assert_eq!(summary.failures, 1);
    assert!(!summary.all_succeeded());
    assert_eq!(summary.total_rows(), 5);
    assert_eq!(
        summary.failed().map(|r| r.source.clone()).collect::<Vec<_>>(),
        vec![PathBuf::from("bad.dbf")]
    );
}

#[test]
fn summary_serializes() {
    let mut result = emitted("a.dbf", 2);
    result.null_counts.insert("VAL_TOT".to_string(), 1);
    let summary = BatchSummary::from_results(vec![result]);
    let json = serde_json::to_string(&summary).expect("serialize summary");
    assert!(json.contains(r#""stage":"emitted""#));
    let round: BatchSummary = serde_json::from_str(&json).expect("deserialize summary");
    assert_eq!(round.successes, 1);
    assert_eq!(round.results[0].total_nulls(), 1);
}

#[test]
fn lookup_table_iterates_in_code_order() {
    let table = LookupTable::from_pairs("raca", [("2", "Preta"), ("1", "Branca")]);
    let codes: Vec<_> = table.iter().map(|(code, _)| code).collect();
    assert_eq!(codes, vec!["1", "2"]);
    assert_eq!(table.len(), 2);
}
