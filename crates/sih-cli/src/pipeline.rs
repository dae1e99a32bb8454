//! Pipeline orchestration.
//!
//! Each input file moves through `Pending -> Decoded -> Projected -> Coerced
//! -> Enriched -> Emitted`. Any error marks the file `Failed` with the last
//! completed stage and the batch carries on with the next file.

use std::path::{Path, PathBuf};
use std::time::Instant;

use encoding_rs::Encoding;
use rayon::prelude::*;
use tracing::{Span, debug, info, info_span, trace, warn};

use sih_common::DEFAULT_SOURCE_ENCODING;
use sih_dbf::{DbfReaderOptions, DbfTable, read_dbf_with_options};
use sih_model::{BatchSummary, CanonicalSchema, FileStage, LookupTables, PipelineResult, Table};
use sih_output::{
    CsvOutputOptions, Result as OutputResult, assign_output_paths, format_cell, output_path,
    write_table_csv,
};
use sih_transform::{apply_enrichment, build_table, coerce_table, project};

use crate::error::PipelineError;
use crate::logging::{log_data_enabled, redact_value};

/// Resolved run options.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory receiving `<stem>.csv` outputs.
    pub output_dir: PathBuf,
    /// Code page of character fields.
    pub encoding: &'static Encoding,
    pub csv: CsvOutputOptions,
    /// Whether lookup enrichment runs.
    pub enrich: bool,
    /// Whether files are processed on the rayon pool.
    pub parallel: bool,
}

impl PipelineOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            encoding: DEFAULT_SOURCE_ENCODING,
            csv: CsvOutputOptions::default(),
            enrich: true,
            parallel: false,
        }
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.csv = self.csv.with_delimiter(delimiter);
        self
    }

    #[must_use]
    pub fn with_enrichment(mut self, enrich: bool) -> Self {
        self.enrich = enrich;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn reader_options(&self) -> DbfReaderOptions {
        DbfReaderOptions::new().with_encoding(self.encoding)
    }
}

/// Callbacks for batch progress. Called from worker threads when the batch
/// runs in parallel.
pub trait BatchObserver: Sync {
    fn file_started(&self, _path: &Path) {}
    fn stage_completed(&self, _path: &Path, _stage: FileStage) {}
    fn file_finished(&self, _result: &PipelineResult) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

/// The conversion pipeline: schema and lookups are fixed at construction and
/// shared read-only by every file.
#[derive(Debug, Clone)]
pub struct Pipeline {
    schema: CanonicalSchema,
    lookups: LookupTables,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(schema: CanonicalSchema, lookups: LookupTables, options: PipelineOptions) -> Self {
        Self {
            schema,
            lookups,
            options,
        }
    }

    pub fn schema(&self) -> &CanonicalSchema {
        &self.schema
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Processes one file. Failures are reported in the result.
    pub fn process_file(&self, path: &Path) -> PipelineResult {
        self.process_file_with(path, &NoopObserver)
    }

    pub fn process_file_with(&self, path: &Path, observer: &dyn BatchObserver) -> PipelineResult {
        let output = output_path(&self.options.output_dir, path);
        self.process_into(path, output, observer)
    }

    fn process_into(
        &self,
        path: &Path,
        output: OutputResult<PathBuf>,
        observer: &dyn BatchObserver,
    ) -> PipelineResult {
        let span = info_span!("process_file", path = %path.display());
        let _guard = span.enter();
        observer.file_started(path);

        let mut result = PipelineResult::pending(path);
        if let Err(error) = self.run_stages(path, output, &mut result, observer) {
            fail(&mut result, &error);
        }
        observer.file_finished(&result);
        result
    }

    fn run_stages(
        &self,
        path: &Path,
        output: OutputResult<PathBuf>,
        result: &mut PipelineResult,
        observer: &dyn BatchObserver,
    ) -> Result<(), PipelineError> {
        let output = output?;
        let start = Instant::now();
        let decoded = read_dbf_with_options(path, self.options.reader_options())?;
        result.rows = decoded.num_rows();
        result.deleted = decoded.deleted_count;
        complete(result, observer, path, start);

        let start = Instant::now();
        let field_names = decoded.header.field_names();
        let projection = project(&field_names, &self.schema)?;
        if !projection.missing.is_empty() {
            warn!(
                missing = projection.missing.len(),
                fields = %projection.missing.join(","),
                "canonical fields absent from input"
            );
        }
        let mut table = build_table(&field_names, &decoded.rows, &projection.kept)?;
        drop(decoded);
        result.missing_columns = projection.missing;
        complete(result, observer, path, start);

        let start = Instant::now();
        let coercion = coerce_table(&mut table, &self.schema)?;
        result.null_counts = coercion.null_counts;
        complete(result, observer, path, start);

        let start = Instant::now();
        if self.options.enrich {
            let enrichment = apply_enrichment(&mut table, &self.schema, &self.lookups)?;
            result.unmatched = enrichment.unmatched;
        } else {
            debug!("enrichment disabled");
        }
        complete(result, observer, path, start);

        let start = Instant::now();
        trace_first_row(&table);
        write_table_csv(&output, &table, &self.options.csv)?;
        complete(result, observer, path, start);
        result.succeed(output);
        Ok(())
    }

    /// Processes every file, sequentially or on the rayon pool.
    pub fn run_batch(&self, paths: &[PathBuf]) -> BatchSummary {
        self.run_batch_with(paths, &NoopObserver)
    }

    pub fn run_batch_with(&self, paths: &[PathBuf], observer: &dyn BatchObserver) -> BatchSummary {
        run_each(
            paths,
            &self.options.output_dir,
            self.options.parallel,
            |path, output| self.process_into(path, output, observer),
        )
    }
}

/// Decodes one file and writes every field as raw text, in descriptor
/// order, without projection or coercion.
pub fn convert_file(
    path: &Path,
    options: &PipelineOptions,
    observer: &dyn BatchObserver,
) -> PipelineResult {
    convert_into(path, output_path(&options.output_dir, path), options, observer)
}

fn convert_into(
    path: &Path,
    output: OutputResult<PathBuf>,
    options: &PipelineOptions,
    observer: &dyn BatchObserver,
) -> PipelineResult {
    let span = info_span!("convert_file", path = %path.display());
    let _guard = span.enter();
    observer.file_started(path);

    let mut result = PipelineResult::pending(path);
    let outcome = (|| -> Result<PathBuf, PipelineError> {
        let output = output?;
        let start = Instant::now();
        let decoded = read_dbf_with_options(path, options.reader_options())?;
        result.rows = decoded.num_rows();
        result.deleted = decoded.deleted_count;
        complete(&mut result, observer, path, start);

        let start = Instant::now();
        let table = raw_table(&decoded)?;
        write_table_csv(&output, &table, &options.csv)?;
        result.reach(FileStage::Emitted);
        observer.stage_completed(path, FileStage::Emitted);
        debug!(
            stage = %FileStage::Emitted,
            duration_ms = start.elapsed().as_millis(),
            "stage complete"
        );
        Ok(output)
    })();

    match outcome {
        Ok(output) => result.succeed(output),
        Err(error) => fail(&mut result, &error),
    }
    observer.file_finished(&result);
    result
}

/// Raw conversion of every file.
pub fn convert_batch(
    paths: &[PathBuf],
    options: &PipelineOptions,
    observer: &dyn BatchObserver,
) -> BatchSummary {
    run_each(
        paths,
        &options.output_dir,
        options.parallel,
        |path, output| convert_into(path, output, options, observer),
    )
}

fn raw_table(decoded: &DbfTable) -> Result<Table, PipelineError> {
    let columns = decoded.header.field_names();
    Ok(build_table(&columns, &decoded.rows, &columns)?)
}

/// Runs `process` over every path and folds the results into a summary in
/// input order. Counters are computed from the collected results only.
///
/// Output paths are assigned before any file runs, so a file whose output
/// name is already taken by an earlier input fails instead of overwriting it.
fn run_each<F>(paths: &[PathBuf], output_dir: &Path, parallel: bool, process: F) -> BatchSummary
where
    F: Fn(&Path, OutputResult<PathBuf>) -> PipelineResult + Sync,
{
    let span = info_span!("batch", files = paths.len(), parallel);
    let _guard = span.enter();
    let start = Instant::now();

    let outputs = assign_output_paths(output_dir, paths);
    let results: Vec<PipelineResult> = if parallel {
        let parent = Span::current();
        paths
            .par_iter()
            .zip(outputs.into_par_iter())
            .map(|(path, output)| parent.in_scope(|| process(path, output)))
            .collect()
    } else {
        paths
            .iter()
            .zip(outputs)
            .map(|(path, output)| process(path, output))
            .collect()
    };

    let summary = BatchSummary::from_results(results);
    info!(
        successes = summary.successes,
        failures = summary.failures,
        rows = summary.total_rows(),
        duration_ms = start.elapsed().as_millis(),
        "batch complete"
    );
    summary
}

fn complete(
    result: &mut PipelineResult,
    observer: &dyn BatchObserver,
    path: &Path,
    start: Instant,
) {
    result.advance();
    observer.stage_completed(path, result.stage);
    debug!(
        stage = %result.stage,
        duration_ms = start.elapsed().as_millis(),
        "stage complete"
    );
}

fn fail(result: &mut PipelineResult, error: &PipelineError) {
    warn!(stage = %result.last_completed, error = %error, "file failed");
    result.fail(error);
}

fn trace_first_row(table: &Table) {
    if !tracing::enabled!(tracing::Level::TRACE) {
        return;
    }
    let Some(row) = table.rows.first() else {
        return;
    };
    let preview = row
        .iter()
        .map(|cell| format_cell(cell).into_owned())
        .collect::<Vec<_>>()
        .join("|");
    trace!(
        log_data = log_data_enabled(),
        row = %redact_value(&preview),
        "first output row"
    );
}
