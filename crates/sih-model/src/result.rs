//! Per-file outcomes and batch summaries.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Stage of the per-file state machine.
///
/// `Pending -> Decoded -> Projected -> Coerced -> Enriched -> Emitted`, or
/// `Failed` from any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStage {
    Pending,
    Decoded,
    Projected,
    Coerced,
    Enriched,
    Emitted,
    Failed,
}

impl FileStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStage::Pending => "pending",
            FileStage::Decoded => "decoded",
            FileStage::Projected => "projected",
            FileStage::Coerced => "coerced",
            FileStage::Enriched => "enriched",
            FileStage::Emitted => "emitted",
            FileStage::Failed => "failed",
        }
    }

    /// The stage that follows a successful step. Terminal stages stay put.
    pub fn next(self) -> Self {
        match self {
            FileStage::Pending => FileStage::Decoded,
            FileStage::Decoded => FileStage::Projected,
            FileStage::Projected => FileStage::Coerced,
            FileStage::Coerced => FileStage::Enriched,
            FileStage::Enriched => FileStage::Emitted,
            FileStage::Emitted => FileStage::Emitted,
            FileStage::Failed => FileStage::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FileStage::Emitted | FileStage::Failed)
    }
}

impl fmt::Display for FileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of processing one input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub source: PathBuf,
    pub output: Option<PathBuf>,
    /// Final stage: `Emitted` on success, `Failed` otherwise.
    pub stage: FileStage,
    /// Last stage completed before the outcome was decided.
    pub last_completed: FileStage,
    pub success: bool,
    pub rows: usize,
    pub deleted: u32,
    /// Canonical columns absent from the input.
    pub missing_columns: Vec<String>,
    /// Cells per column that failed coercion and became missing.
    pub null_counts: BTreeMap<String, usize>,
    /// Codes without a label, per coded column.
    #[serde(default)]
    pub unmatched: BTreeMap<String, usize>,
    pub error: Option<String>,
}

impl PipelineResult {
    pub fn pending(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: None,
            stage: FileStage::Pending,
            last_completed: FileStage::Pending,
            success: false,
            rows: 0,
            deleted: 0,
            missing_columns: Vec::new(),
            null_counts: BTreeMap::new(),
            unmatched: BTreeMap::new(),
            error: None,
        }
    }

    /// Records a completed step.
    pub fn advance(&mut self) {
        self.reach(self.stage.next());
    }

    /// Records completion of `stage` directly, for flows that skip steps.
    pub fn reach(&mut self, stage: FileStage) {
        self.stage = stage;
        self.last_completed = stage;
    }

    pub fn succeed(&mut self, output: PathBuf) {
        self.output = Some(output);
        self.success = true;
    }

    pub fn fail(&mut self, error: impl fmt::Display) {
        self.stage = FileStage::Failed;
        self.success = false;
        self.error = Some(error.to_string());
    }

    /// Total coercion failures across all columns.
    pub fn total_nulls(&self) -> usize {
        self.null_counts.values().sum()
    }
}

/// Results of a batch with success and failure counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub results: Vec<PipelineResult>,
    pub successes: usize,
    pub failures: usize,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: PipelineResult) {
        if result.success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        self.results.push(result);
    }

    pub fn from_results(results: impl IntoIterator<Item = PipelineResult>) -> Self {
        let mut summary = Self::new();
        for result in results {
            summary.push(result);
        }
        summary
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures == 0
    }

    pub fn total_rows(&self) -> usize {
        self.results.iter().map(|result| result.rows).sum()
    }

    pub fn failed(&self) -> impl Iterator<Item = &PipelineResult> {
        self.results.iter().filter(|result| !result.success)
    }
}
