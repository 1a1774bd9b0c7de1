//! File-level reconciliation run: load CSVs, reconcile, write outputs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use timesheet_engine::{ReconcileReport, SourceTables, reconcile};
use timesheet_ingest::{read_table, write_table};
use timesheet_model::{LabelConfig, ReconcileOptions, SummaryRow};
use tracing::{info, info_span};

/// Input and output locations of one run.
#[derive(Debug, Clone)]
pub struct ReconcileRequest {
    pub base: PathBuf,
    pub identity: PathBuf,
    pub leave: PathBuf,
    pub overrides: PathBuf,
    /// Reconciled CSV; defaults to `<base>_reconciled.csv` next to the base file.
    pub output: Option<PathBuf>,
    /// Optional CSV dump of the expanded leave grid.
    pub leave_grid_output: Option<PathBuf>,
    pub options: ReconcileOptions,
    /// Reconcile and report without writing any file.
    pub dry_run: bool,
}

/// Outcome of a run, for the summary printout.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub report: ReconcileReport,
    pub summaries: Vec<SummaryRow>,
    pub rows: usize,
    pub columns: usize,
    pub output: Option<PathBuf>,
    pub leave_grid_output: Option<PathBuf>,
}

/// `<dir>/<stem>_reconciled.csv` for a base file at `<dir>/<stem>.csv`.
pub fn default_output_path(base: &Path) -> PathBuf {
    let stem = base
        .file_stem()
        .map_or_else(|| "timesheet".into(), |stem| stem.to_string_lossy());
    base.with_file_name(format!("{stem}_reconciled.csv"))
}

/// Load a label table from JSON, or use `fallback` when no path is given.
pub fn load_labels(path: Option<&Path>, fallback: LabelConfig) -> Result<LabelConfig> {
    let Some(path) = path else {
        return Ok(fallback);
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("read label file {}", path.display()))?;
    let labels: LabelConfig = serde_json::from_str(&text)
        .with_context(|| format!("parse label file {}", path.display()))?;
    labels
        .validate()
        .with_context(|| format!("validate label file {}", path.display()))?;
    Ok(labels)
}

fn load(path: &Path, table: &str) -> Result<DataFrame> {
    read_table(path).with_context(|| format!("read {table} table {}", path.display()))
}

/// Load the four tables from CSV.
pub fn load_tables(request: &ReconcileRequest) -> Result<SourceTables> {
    let span = info_span!("ingest");
    let _guard = span.enter();
    let start = Instant::now();
    let tables = SourceTables {
        base: load(&request.base, "base")?,
        identity: load(&request.identity, "identity")?,
        leave: load(&request.leave, "leave")?,
        overrides: load(&request.overrides, "overrides")?,
    };
    info!(
        base_rows = tables.base.height(),
        identity_rows = tables.identity.height(),
        leave_rows = tables.leave.height(),
        override_rows = tables.overrides.height(),
        duration_ms = start.elapsed().as_millis(),
        "tables loaded"
    );
    Ok(tables)
}

/// Run a full reconciliation from files.
pub fn run(request: &ReconcileRequest) -> Result<RunResult> {
    let tables = load_tables(request)?;
    let reconciled = reconcile(tables, &request.options).with_context(|| {
        format!(
            "reconcile {} (identity {}, leave {}, overrides {})",
            request.base.display(),
            request.identity.display(),
            request.leave.display(),
            request.overrides.display()
        )
    })?;
    let mut table = reconciled.table;

    let mut result = RunResult {
        report: reconciled.report,
        summaries: reconciled.summaries,
        rows: table.height(),
        columns: table.width(),
        output: None,
        leave_grid_output: None,
    };
    if request.dry_run {
        info!("dry run, no files written");
        return Ok(result);
    }

    let output = request
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&request.base));
    write_table(&mut table, &output)
        .with_context(|| format!("write reconciled table {}", output.display()))?;
    info!(path = %output.display(), "reconciled table written");
    result.output = Some(output);

    if let Some(path) = &request.leave_grid_output {
        let mut grid = reconciled
            .leave_grid
            .to_frame()
            .context("render leave grid")?;
        write_table(&mut grid, path)
            .with_context(|| format!("write leave grid {}", path.display()))?;
        info!(path = %path.display(), "leave grid written");
        result.leave_grid_output = Some(path.clone());
    }
    Ok(result)
}
