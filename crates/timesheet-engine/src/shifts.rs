//! Shift override table cleanup.
//!
//! Override sheets are hand-edited, so day cells contain notes, typos and
//! formulas next to real values. Only hours and `OFF` survive sanitizing.

use std::collections::HashMap;

use polars::prelude::DataFrame;
use timesheet_model::{Identifier, Result, is_off, parse_hours};
use tracing::{debug, warn};

use crate::calendar::{ColumnKey, ColumnLayout};
use crate::data_utils::{require_columns, set_text_column, text_column};
use crate::ids::{IdFormat, IdResolver};
use crate::merge::FillSource;

/// Cleans day cells of an override table.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShiftSanitizer;

impl ShiftSanitizer {
    /// Keep a cell that is a number or `OFF`, exactly as written; anything
    /// else becomes missing.
    pub fn sanitize_cell(raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        (parse_hours(trimmed).is_some() || is_off(trimmed)).then(|| raw.to_string())
    }

    /// Sanitize every day column of `df`. Metadata columns are left alone.
    ///
    /// Returns the cleaned table and the number of discarded cells.
    pub fn sanitize(mut df: DataFrame) -> Result<(DataFrame, usize)> {
        let layout = ColumnLayout::classify(&df);
        let day_columns: Vec<String> = layout
            .day_columns()
            .map(|(name, _)| name.to_string())
            .collect();

        let mut discarded = 0usize;
        for name in &day_columns {
            let values = text_column(&df, name)?;
            let mut column_discarded = 0usize;
            let cleaned = values
                .into_iter()
                .map(|value| {
                    let raw = value?;
                    let kept = Self::sanitize_cell(&raw);
                    if kept.is_none() {
                        column_discarded += 1;
                    }
                    kept
                })
                .collect();
            set_text_column(&mut df, name, cleaned)?;
            if column_discarded > 0 {
                debug!(column = %name, discarded = column_discarded, "discarded override cells");
            }
            discarded += column_discarded;
        }
        if discarded > 0 {
            warn!(discarded, "override cells were neither hours nor OFF");
        }
        Ok((df, discarded))
    }
}

/// Sanitized override table keyed by canonical identifier.
#[derive(Debug, Clone, Default)]
pub struct ShiftGrid {
    columns: Vec<ColumnKey>,
    values: HashMap<ColumnKey, HashMap<Identifier, String>>,
    rows: usize,
}

impl ShiftGrid {
    /// Index a sanitized override table by identifier.
    ///
    /// Later rows win when an identifier repeats. Missing cells are dropped,
    /// so a later empty cell never hides an earlier value.
    pub fn from_frame(df: &DataFrame, id_column: &str, resolver: &IdResolver) -> Result<Self> {
        let mut resolved = require_columns(df, "overrides", &[id_column])?;
        let id_column = resolved.remove(0);
        let ids = resolver.resolve_column(df, &id_column, "overrides", IdFormat::Text)?;
        let layout = ColumnLayout::classify(df);

        let mut grid = Self {
            rows: df.height(),
            ..Self::default()
        };
        for column in layout.columns() {
            if column.name == id_column {
                continue;
            }
            let key = column.key();
            let mut lookup = HashMap::new();
            for (value, id) in text_column(df, &column.name)?.into_iter().zip(&ids) {
                if let Some(value) = value {
                    lookup.insert(id.clone(), value);
                }
            }
            grid.columns.push(key.clone());
            grid.values.insert(key, lookup);
        }
        Ok(grid)
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }
}

impl FillSource for ShiftGrid {
    fn source_name(&self) -> &str {
        "overrides"
    }

    fn fill_columns(&self) -> Vec<ColumnKey> {
        self.columns.clone()
    }

    fn values_for(&self, key: &ColumnKey) -> HashMap<Identifier, String> {
        self.values.get(key).cloned().unwrap_or_default()
    }
}
