//! The reconciliation pipeline.
//!
//! Stages run strictly in order, each consuming the complete output of the
//! previous one:
//!
//! 1. canonicalize base identifiers and classify columns
//! 2. expand leave intervals against the identity table
//! 3. sanitize the shift override table
//! 4. merge leave, then overrides, into empty base cells
//! 5. fill what is still empty from the calendar
//! 6. summarize each row and append the summary columns
//! 7. relabel for presentation
//!
//! Any error aborts the run; there is no partial output.

use std::time::Instant;

use polars::prelude::DataFrame;
use serde::Serialize;
use timesheet_model::{ReconcileOptions, Result, SummaryRow};
use tracing::{info, info_span};

use crate::calendar::ReportingPeriod;
use crate::fill::DefaultFiller;
use crate::frame::TimesheetFrame;
use crate::ids::IdResolver;
use crate::leave::{IntervalExpander, LeaveGrid};
use crate::merge::{FillStats, SourceMerger};
use crate::relabel::{RelabelStats, Relabeler};
use crate::shifts::{ShiftGrid, ShiftSanitizer};
use crate::summary::RowSummarizer;

/// The four input tables of a run.
#[derive(Debug, Clone)]
pub struct SourceTables {
    /// One row per employee; metadata columns followed by day columns.
    pub base: DataFrame,
    /// Email to numeric identifier directory.
    pub identity: DataFrame,
    /// Leave intervals keyed by email.
    pub leave: DataFrame,
    /// Hand-maintained shift overrides keyed by identifier.
    pub overrides: DataFrame,
}

/// Counts collected while reconciling.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileReport {
    pub employees: usize,
    pub day_columns: usize,
    pub month_name: String,
    pub last_day: u32,
    pub leave_intervals: usize,
    pub leave_emails: usize,
    pub unmatched_leave_emails: usize,
    pub leave_fill: FillStats,
    pub override_cells_discarded: usize,
    pub override_fill: FillStats,
    pub default_cells_filled: usize,
    pub summary_columns: Vec<String>,
    pub relabel: RelabelStats,
}

/// Output of a run.
#[derive(Debug, Clone)]
pub struct Reconciled {
    /// The finished, relabeled table.
    pub table: DataFrame,
    /// Aggregates per base row, in row order.
    pub summaries: Vec<SummaryRow>,
    /// The expanded leave grid, for diagnostics.
    pub leave_grid: LeaveGrid,
    pub report: ReconcileReport,
}

/// Reconcile the four source tables into one monthly timesheet.
///
/// # Errors
///
/// Returns the first schema, identifier, date or configuration error
/// encountered. The inputs are consumed either way.
pub fn reconcile(tables: SourceTables, options: &ReconcileOptions) -> Result<Reconciled> {
    let run_start = Instant::now();
    options.validate()?;
    let columns = &options.columns;
    let resolver = IdResolver::new(options.identifier_width);
    let mut report = ReconcileReport::default();

    let SourceTables {
        base,
        identity,
        leave,
        overrides,
    } = tables;

    let mut frame = info_span!("resolve").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let frame = TimesheetFrame::from_base(base, &columns.base_id, &resolver)?;
        info!(
            rows = frame.height(),
            day_columns = frame.layout().day_count(),
            duration_ms = start.elapsed().as_millis(),
            "base table resolved"
        );
        Ok(frame)
    })?;
    let period = ReportingPeriod::from_layout(frame.layout(), &options.labels);
    report.employees = frame.height();
    report.day_columns = frame.layout().day_count();
    report.month_name = period.month_name.clone();
    report.last_day = period.last_day;

    let leave_grid = info_span!("expand_leave").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let grid = IntervalExpander::new(columns.clone(), resolver).expand(&leave, &identity)?;
        info!(
            intervals = grid.interval_count(),
            emails = grid.rows().len(),
            unmatched = grid.unmatched_emails().len(),
            days = grid.dates().len(),
            duration_ms = start.elapsed().as_millis(),
            "leave expanded"
        );
        Ok(grid)
    })?;
    report.leave_intervals = leave_grid.interval_count();
    report.leave_emails = leave_grid.rows().len();
    report.unmatched_leave_emails = leave_grid.unmatched_emails().len();

    let shift_grid = info_span!("sanitize_shifts").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let (clean, discarded) = ShiftSanitizer::sanitize(overrides)?;
        let grid = ShiftGrid::from_frame(&clean, &columns.override_id, &resolver)?;
        info!(
            rows = grid.row_count(),
            discarded,
            duration_ms = start.elapsed().as_millis(),
            "overrides sanitized"
        );
        Ok((grid, discarded))
    })?;
    let (shift_grid, discarded) = shift_grid;
    report.override_cells_discarded = discarded;

    report.leave_fill = info_span!("merge", source = "leave").in_scope(|| -> Result<_> {
        let stats = SourceMerger::fill_from(&mut frame, &leave_grid)?;
        info!(columns = stats.columns, filled = stats.cells, "leave merged");
        Ok(stats)
    })?;
    report.override_fill = info_span!("merge", source = "overrides").in_scope(|| -> Result<_> {
        let stats = SourceMerger::fill_from(&mut frame, &shift_grid)?;
        info!(columns = stats.columns, filled = stats.cells, "overrides merged");
        Ok(stats)
    })?;

    report.default_cells_filled = info_span!("fill_defaults").in_scope(|| -> Result<_> {
        let filled = DefaultFiller::new(options.workday_value()).fill(&mut frame)?;
        info!(filled, "calendar defaults applied");
        Ok(filled)
    })?;

    let summarizer = RowSummarizer::new(&options.labels);
    let summaries = info_span!("summarize").in_scope(|| -> Result<_> {
        let rows = summarizer.summarize(&frame)?;
        report.summary_columns = summarizer.append(&mut frame, &rows, &period)?;
        info!(
            rows = rows.len(),
            columns = report.summary_columns.len(),
            "summaries appended"
        );
        Ok(rows)
    })?;

    let table = info_span!("relabel").in_scope(|| -> Result<_> {
        let (table, stats) = Relabeler::new(options).apply(frame, &period)?;
        info!(
            dropped = stats.dropped_columns.len(),
            shortened = stats.shortened_cells,
            renamed = stats.renamed_columns.len(),
            anonymized = stats.anonymized,
            "table relabeled"
        );
        report.relabel = stats;
        Ok(table)
    })?;

    info!(
        rows = table.height(),
        columns = table.width(),
        duration_ms = run_start.elapsed().as_millis(),
        "reconciliation complete"
    );
    Ok(Reconciled {
        table,
        summaries,
        leave_grid,
        report,
    })
}
