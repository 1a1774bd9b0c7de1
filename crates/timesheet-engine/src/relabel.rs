//! Presentation pass over the reconciled table.
//!
//! Nothing here changes a number: raw leave labels become short display
//! codes, export artifacts are dropped, month-suffixed headers get the real
//! month, and identifiers are masked.

use polars::prelude::DataFrame;
use serde::Serialize;
use timesheet_model::{LeaveCode, ReconcileOptions, Result, mask_identifier};
use tracing::{debug, warn};

use crate::calendar::{ColumnLayout, ReportingPeriod};
use crate::data_utils::{polars_error, set_text_column, text_column};
use crate::frame::TimesheetFrame;

/// What the relabeler changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelabelStats {
    pub dropped_columns: Vec<String>,
    pub shortened_cells: usize,
    pub renamed_columns: Vec<(String, String)>,
    pub anonymized: bool,
}

/// Localizes and anonymizes the output table.
#[derive(Debug, Clone, Copy)]
pub struct Relabeler<'a> {
    options: &'a ReconcileOptions,
}

impl<'a> Relabeler<'a> {
    pub fn new(options: &'a ReconcileOptions) -> Self {
        Self { options }
    }

    /// Run every presentation step and return the final table.
    pub fn apply(
        &self,
        frame: TimesheetFrame,
        period: &ReportingPeriod,
    ) -> Result<(DataFrame, RelabelStats)> {
        let id_column = frame.id_column().to_string();
        let mut df = frame.into_data();
        let mut stats = RelabelStats {
            dropped_columns: drop_artifact_columns(&mut df),
            ..RelabelStats::default()
        };
        stats.shortened_cells = self.shorten_leave_labels(&mut df)?;
        stats.renamed_columns = self.rename_month_window(&mut df, &period.month_name)?;
        if self.options.anonymize {
            self.anonymize(&mut df, &id_column)?;
            stats.anonymized = true;
        }
        Ok((df, stats))
    }

    /// Replace canonical leave labels in day columns with short codes.
    pub fn shorten_leave_labels(&self, df: &mut DataFrame) -> Result<usize> {
        let layout = ColumnLayout::classify(df);
        let day_columns: Vec<String> = layout
            .day_columns()
            .map(|(name, _)| name.to_string())
            .collect();
        let labels = &self.options.labels;

        let mut replaced = 0usize;
        for name in &day_columns {
            let mut values = text_column(df, name)?;
            let mut changed = false;
            for cell in values.iter_mut() {
                let Some(code) = cell.as_deref().and_then(LeaveCode::from_label) else {
                    continue;
                };
                *cell = Some(labels.short_code(code).to_string());
                changed = true;
                replaced += 1;
            }
            if changed {
                set_text_column(df, name, values)?;
            }
        }
        Ok(replaced)
    }

    /// Substitute the month placeholder in the columns following the anchor.
    ///
    /// A missing anchor skips the step. A rename that would collide with an
    /// existing column is skipped too.
    pub fn rename_month_window(
        &self,
        df: &mut DataFrame,
        month_name: &str,
    ) -> Result<Vec<(String, String)>> {
        let labels = &self.options.labels;
        let placeholder = labels.month_placeholder.as_str();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let Some(anchor) = names
            .iter()
            .position(|name| name.trim() == labels.anchor_column.trim())
        else {
            warn!(
                anchor = %labels.anchor_column,
                "anchor column not found, month rename skipped"
            );
            return Ok(Vec::new());
        };
        if placeholder.is_empty() {
            return Ok(Vec::new());
        }

        let mut names = names;
        let mut renamed = Vec::new();
        let window_end = names.len().min(anchor + 1 + self.options.rename_window);
        for idx in anchor + 1..window_end {
            let old = names[idx].clone();
            let new = old.replace(placeholder, month_name);
            if new == old {
                continue;
            }
            if names.contains(&new) {
                warn!(column = %old, target = %new, "rename would duplicate a column, skipped");
                continue;
            }
            df.rename(&old, new.as_str().into()).map_err(polars_error)?;
            debug!(from = %old, to = %new, "renamed month column");
            names[idx] = new.clone();
            renamed.push((old, new));
        }
        Ok(renamed)
    }

    /// Mask the tail of every identifier.
    pub fn anonymize(&self, df: &mut DataFrame, id_column: &str) -> Result<()> {
        let masked = text_column(df, id_column)?
            .into_iter()
            .map(|value| value.map(|id| mask_identifier(&id, &self.options.mask)))
            .collect();
        set_text_column(df, id_column, masked)
    }
}

/// Drop blank and `Unnamed: N` headers left behind by spreadsheet exports.
fn drop_artifact_columns(df: &mut DataFrame) -> Vec<String> {
    let artifacts: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .filter(|name| is_artifact_header(name))
        .collect();
    for name in &artifacts {
        if df.drop_in_place(name).is_ok() {
            debug!(column = %name, "dropped export artifact column");
        }
    }
    artifacts
}

fn is_artifact_header(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.is_empty() || trimmed.starts_with("Unnamed:")
}
