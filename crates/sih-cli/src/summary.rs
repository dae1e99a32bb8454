use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use sih_model::{BatchSummary, FileStage, PipelineResult};

pub fn print_summary(summary: &BatchSummary, output_dir: &Path) {
    println!("Output: {}", output_dir.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Stage"),
        header_cell("Rows"),
        header_cell("Deleted"),
        header_cell("Nulls"),
        header_cell("Unmatched"),
        header_cell("Missing"),
        header_cell("CSV"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for index in 2..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 7, CellAlignment::Center);

    let mut total_deleted = 0u64;
    let mut total_nulls = 0usize;
    let mut total_unmatched = 0usize;
    for result in &summary.results {
        total_deleted += u64::from(result.deleted);
        total_nulls += result.total_nulls();
        let unmatched: usize = result.unmatched.values().sum();
        total_unmatched += unmatched;
        table.add_row(vec![
            file_cell(result),
            stage_cell(result),
            Cell::new(result.rows),
            count_cell(Some(result.deleted as usize), Color::DarkYellow),
            count_cell(Some(result.total_nulls()), Color::Yellow),
            count_cell(Some(unmatched), Color::Yellow),
            count_cell(Some(result.missing_columns.len()), Color::Yellow),
            output_cell(result.output.as_deref()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} ok / {} failed", summary.successes, summary.failures))
            .fg(if summary.failures > 0 {
                Color::Red
            } else {
                Color::Green
            })
            .add_attribute(Attribute::Bold),
        Cell::new(summary.total_rows()).add_attribute(Attribute::Bold),
        Cell::new(total_deleted).add_attribute(Attribute::Bold),
        count_cell(Some(total_nulls), Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(Some(total_unmatched), Color::Yellow).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");

    if summary.failures > 0 {
        eprintln!("Errors:");
        for result in summary.failed() {
            eprintln!(
                "- {} (after {}): {}",
                result.source.display(),
                result.last_completed,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 8 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
        ]);
    }
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn file_cell(result: &PipelineResult) -> Cell {
    let name = result
        .source
        .file_name()
        .map_or_else(|| result.source.display().to_string(), |name| {
            name.to_string_lossy().into_owned()
        });
    if result.success {
        Cell::new(name).fg(Color::Blue).add_attribute(Attribute::Bold)
    } else {
        Cell::new(name).fg(Color::Red)
    }
}

fn stage_cell(result: &PipelineResult) -> Cell {
    match result.stage {
        FileStage::Failed => Cell::new(format!("failed ({})", result.last_completed))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        FileStage::Emitted => Cell::new(result.stage).fg(Color::Green),
        stage => Cell::new(stage).fg(Color::Yellow),
    }
}

fn output_cell(path: Option<&Path>) -> Cell {
    match path {
        Some(_) => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        None => dim_cell("-"),
    }
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
