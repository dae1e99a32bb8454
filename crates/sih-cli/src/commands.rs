use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment, Color, Table};
use tracing::{info, info_span};

use sih_cli::{collect_inputs, load_lookups};
use sih_cli::pipeline::{BatchObserver, Pipeline, PipelineOptions, convert_batch};
use sih_dbf::{DbfReaderOptions, read_dbf_with_options};
use sih_model::{BatchSummary, PipelineResult};
use sih_standards::{DiagnosisSource, default_diagnosis_path, sih_schema, static_lookup_tables};

use crate::cli::{ConvertArgs, InputArgs, InspectArgs, ProcessArgs};
use crate::summary::{align_column, apply_table_style, dim_cell, header_cell};

/// Logs each finished file.
struct LogObserver;

impl BatchObserver for LogObserver {
    fn file_finished(&self, result: &PipelineResult) {
        if result.success {
            info!(
                source = %result.source.display(),
                rows = result.rows,
                nulls = result.total_nulls(),
                "file converted"
            );
        }
    }
}

pub fn run_process(args: &ProcessArgs) -> Result<BatchSummary> {
    let span = info_span!("process", output_dir = %args.input.output_dir.display());
    let _guard = span.enter();

    let inputs = collect_inputs(&args.input.inputs).context("collect inputs")?;
    let schema = sih_schema().context("build canonical schema")?;
    let lookups = if args.no_enrich {
        static_lookup_tables()
    } else {
        let diagnosis = args.diagnosis.clone().or_else(default_diagnosis_path);
        let source = DiagnosisSource::default().with_delimiter(args.diagnosis_delimiter);
        load_lookups(diagnosis.as_deref(), &source).context("prepare lookup tables")?
    };
    prepare_output_dir(&args.input.output_dir)?;

    let options = pipeline_options(&args.input).with_enrichment(!args.no_enrich);
    let pipeline = Pipeline::new(schema, lookups, options);
    let summary = pipeline.run_batch_with(&inputs, &LogObserver);
    write_report_if_requested(&args.input, &summary)?;
    Ok(summary)
}

pub fn run_convert(args: &ConvertArgs) -> Result<BatchSummary> {
    let span = info_span!("convert", output_dir = %args.input.output_dir.display());
    let _guard = span.enter();

    let inputs = collect_inputs(&args.input.inputs).context("collect inputs")?;
    prepare_output_dir(&args.input.output_dir)?;
    let options = pipeline_options(&args.input);
    let summary = convert_batch(&inputs, &options, &LogObserver);
    write_report_if_requested(&args.input, &summary)?;
    Ok(summary)
}

pub fn run_schema() -> Result<()> {
    let schema = sih_schema().context("build canonical schema")?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Role"),
        header_cell("Type"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    for field in schema.fields() {
        table.add_row(vec![
            field.name.clone(),
            field.role.to_string(),
            field.target.to_string(),
            field.description.clone(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let options = DbfReaderOptions::new().with_encoding(args.encoding);
    let decoded = read_dbf_with_options(&args.file, options)
        .with_context(|| format!("read {}", args.file.display()))?;
    let schema = sih_schema().context("build canonical schema")?;
    let header = &decoded.header;

    println!("File: {}", args.file.display());
    println!("Version: 0x{:02X}", header.version);
    match header.last_update {
        Some(date) => println!("Last update: {date}"),
        None => println!("Last update: -"),
    }
    println!(
        "Records: {} ({} deleted)",
        header.record_count, decoded.deleted_count
    );
    println!(
        "Header length: {} / record length: {}",
        header.header_length, header.record_length
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Length"),
        header_cell("Decimals"),
        header_cell("Canonical"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);
    for (index, field) in header.fields.iter().enumerate() {
        let canonical = if schema.contains(&field.name) {
            Cell::new("✓").fg(Color::Green)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&field.name),
            Cell::new(field.field_type),
            Cell::new(field.length),
            Cell::new(field.decimal_count),
            canonical,
        ]);
    }
    println!("{table}");
    Ok(())
}

fn pipeline_options(args: &InputArgs) -> PipelineOptions {
    PipelineOptions::new(&args.output_dir)
        .with_encoding(args.encoding)
        .with_delimiter(args.delimiter)
        .with_parallel(args.parallel)
}

fn prepare_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create output directory {}", dir.display()))
}

fn write_report_if_requested(args: &InputArgs, summary: &BatchSummary) -> Result<()> {
    let Some(path) = &args.report else {
        return Ok(());
    };
    write_report(path, summary)
}

/// Writes the batch summary as pretty JSON.
pub fn write_report(path: &Path, summary: &BatchSummary) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create report {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)
        .with_context(|| format!("write report {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush report {}", path.display()))?;
    info!(path = %path.display(), "batch report written");
    Ok(())
}
