//! Null-coalescing merge of secondary sources into the base timesheet.
//!
//! A source only ever fills cells the base table left empty. Sources are
//! applied one after another, so the first source to fill a cell wins over
//! every later one: calling the merger with the leave grid before the shift
//! grid gives `base > leave > shift`.

use std::collections::HashMap;

use serde::Serialize;
use timesheet_model::{Identifier, Result};
use tracing::debug;

use crate::calendar::ColumnKey;
use crate::frame::TimesheetFrame;

/// A table that can fill empty base cells, keyed by canonical identifier.
pub trait FillSource {
    /// Short name used in logs and reports.
    fn source_name(&self) -> &str;

    /// Columns this source carries, excluding its own identifier columns.
    fn fill_columns(&self) -> Vec<ColumnKey>;

    /// Non-missing values of one column by identifier. When an identifier
    /// occurs more than once, the last non-missing value wins.
    fn values_for(&self, key: &ColumnKey) -> HashMap<Identifier, String>;
}

/// Cells filled by one merge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FillStats {
    /// Columns shared between the base table and the source.
    pub columns: usize,
    /// Base cells that were empty and received a value.
    pub cells: usize,
}

/// Applies [`FillSource`]s to a [`TimesheetFrame`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SourceMerger;

impl SourceMerger {
    /// Fill empty cells of `frame` from `source`.
    ///
    /// Only columns present in both tables are processed. The base identifier
    /// column is never written, and columns the base table lacks are never
    /// introduced.
    pub fn fill_from<S>(frame: &mut TimesheetFrame, source: &S) -> Result<FillStats>
    where
        S: FillSource + ?Sized,
    {
        let mut stats = FillStats::default();
        for key in source.fill_columns() {
            let Some(target) = frame.layout().column_for(&key).map(str::to_string) else {
                continue;
            };
            if target == frame.id_column() {
                continue;
            }
            stats.columns += 1;

            let lookup = source.values_for(&key);
            if lookup.is_empty() {
                continue;
            }
            let mut values = frame.column_text(&target)?;
            let mut filled = 0usize;
            for (cell, id) in values.iter_mut().zip(frame.ids()) {
                if cell.is_none()
                    && let Some(value) = lookup.get(id)
                {
                    *cell = Some(value.clone());
                    filled += 1;
                }
            }
            if filled > 0 {
                frame.set_column_text(&target, values)?;
                debug!(
                    source = source.source_name(),
                    column = %target,
                    filled,
                    "filled empty cells"
                );
            }
            stats.cells += filled;
        }
        Ok(stats)
    }
}
