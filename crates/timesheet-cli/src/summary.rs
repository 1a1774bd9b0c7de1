use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use timesheet_cli::pipeline::RunResult;

/// One line of the run report: stage, counter, value, and whether a
/// non-zero value deserves attention.
struct ReportLine {
    stage: &'static str,
    counter: &'static str,
    value: usize,
    warn_if_positive: bool,
}

impl ReportLine {
    fn new(stage: &'static str, counter: &'static str, value: usize) -> Self {
        Self {
            stage,
            counter,
            value,
            warn_if_positive: false,
        }
    }

    fn warning(stage: &'static str, counter: &'static str, value: usize) -> Self {
        Self {
            warn_if_positive: true,
            ..Self::new(stage, counter, value)
        }
    }
}

fn report_lines(result: &RunResult) -> Vec<ReportLine> {
    let report = &result.report;
    vec![
        ReportLine::new("resolve", "employees", report.employees),
        ReportLine::new("resolve", "day columns", report.day_columns),
        ReportLine::new("expand_leave", "intervals", report.leave_intervals),
        ReportLine::new("expand_leave", "emails", report.leave_emails),
        ReportLine::warning("expand_leave", "unmatched emails", report.unmatched_leave_emails),
        ReportLine::warning(
            "sanitize_shifts",
            "cells discarded",
            report.override_cells_discarded,
        ),
        ReportLine::new("merge leave", "cells filled", report.leave_fill.cells),
        ReportLine::new("merge overrides", "cells filled", report.override_fill.cells),
        ReportLine::new("fill_defaults", "cells filled", report.default_cells_filled),
        ReportLine::new("summarize", "columns", report.summary_columns.len()),
        ReportLine::new("relabel", "columns dropped", report.relabel.dropped_columns.len()),
        ReportLine::new("relabel", "cells shortened", report.relabel.shortened_cells),
        ReportLine::new("relabel", "columns renamed", report.relabel.renamed_columns.len()),
        ReportLine::new(
            "relabel",
            "ids anonymized",
            usize::from(report.relabel.anonymized),
        ),
    ]
}

pub fn print_summary(result: &RunResult) {
    let report = &result.report;
    println!("Period: {} (1-{})", report.month_name, report.last_day);
    match &result.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run, nothing written)"),
    }
    if let Some(path) = &result.leave_grid_output {
        println!("Leave grid: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Counter"),
        header_cell("Value"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for line in report_lines(result) {
        let value = if line.warn_if_positive {
            count_cell(line.value, Color::Yellow)
        } else {
            Cell::new(line.value)
        };
        table.add_row(vec![
            Cell::new(line.stage).fg(Color::Cyan),
            Cell::new(line.counter),
            value,
        ]);
    }
    let total_hours: f64 = result.summaries.iter().map(|row| row.month_hours).sum();
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("hours").add_attribute(Attribute::Bold),
        Cell::new(format!("{total_hours}")).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    println!("Table: {} rows x {} columns", result.rows, result.columns);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count).add_attribute(Attribute::Dim)
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

#[cfg(test)]
mod tests {
    use super::*;
    use timesheet_engine::ReconcileReport;

    #[test]
    fn report_lines_flag_lenient_policy_counters() {
        let mut report = ReconcileReport {
            unmatched_leave_emails: 2,
            override_cells_discarded: 1,
            ..ReconcileReport::default()
        };
        report.relabel.anonymized = true;
        let result = RunResult {
            report,
            summaries: Vec::new(),
            rows: 0,
            columns: 0,
            output: None,
            leave_grid_output: None,
        };
        let lines = report_lines(&result);
        let anonymized = lines
            .iter()
            .find(|line| line.counter == "ids anonymized")
            .map(|line| line.value);
        assert_eq!(anonymized, Some(1));

        let flagged: Vec<(&str, usize)> = lines
            .into_iter()
            .filter(|line| line.warn_if_positive)
            .map(|line| (line.counter, line.value))
            .collect();
        assert_eq!(flagged, [("unmatched emails", 2), ("cells discarded", 1)]);
    }
}
