//! DataFrame helpers shared by the reconciliation stages.
//!
//! All stages read cells as optional text and write text columns back; the
//! only numeric columns the engine creates are the summary aggregates.

use std::collections::HashMap;

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, PolarsError, Series};
use timesheet_ingest::column_text;
use timesheet_model::{ReconcileError, Result};

/// Wrap a Polars failure in the engine error type.
pub fn polars_error(err: PolarsError) -> ReconcileError {
    ReconcileError::DataFrame {
        message: err.to_string(),
    }
}

/// Case-insensitive lookup from a wanted column name to the table's spelling.
#[derive(Debug, Clone, Default)]
pub struct CaseInsensitiveSet {
    map: HashMap<String, String>,
}

impl CaseInsensitiveSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for name in names {
            let name = name.as_ref();
            let key = name.to_lowercase();
            map.entry(key).or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    pub fn from_frame(df: &DataFrame) -> Self {
        Self::new(df.get_column_names().iter().map(|name| name.as_str()))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(&name.to_lowercase()).map(String::as_str)
    }
}

/// Resolve each required column to its spelling in `df`.
///
/// # Errors
///
/// Returns [`ReconcileError::Schema`] naming the first missing column.
pub fn require_columns(df: &DataFrame, table: &str, required: &[&str]) -> Result<Vec<String>> {
    let lookup = CaseInsensitiveSet::from_frame(df);
    required
        .iter()
        .map(|wanted| {
            lookup
                .get(wanted)
                .map(str::to_string)
                .ok_or_else(|| ReconcileError::schema(table, *wanted))
        })
        .collect()
}

/// Read a column as optional text; blank cells are `None`.
pub fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    column_text(df, name).map_err(polars_error)
}

/// Build a `String` column from optional text.
pub fn text_series(name: &str, values: Vec<Option<String>>) -> Column {
    Series::new(name.into(), values).into_column()
}

/// Replace (or add) a text column in place.
pub fn set_text_column(df: &mut DataFrame, name: &str, values: Vec<Option<String>>) -> Result<()> {
    df.with_column(text_series(name, values))
        .map_err(polars_error)?;
    Ok(())
}

/// Reassemble a DataFrame from an ordered list of columns.
pub fn rebuild_frame(columns: Vec<Column>) -> Result<DataFrame> {
    DataFrame::new(columns).map_err(polars_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(names: &[&str]) -> DataFrame {
        let columns = names
            .iter()
            .map(|name| text_series(name, vec![Some("x".to_string())]))
            .collect();
        rebuild_frame(columns).unwrap()
    }

    #[test]
    fn require_columns_resolves_case() {
        let df = frame(&["email", "ID number"]);
        let resolved = require_columns(&df, "identity", &["Email", "ID number"]).unwrap();
        assert_eq!(resolved, vec!["email".to_string(), "ID number".to_string()]);
    }

    #[test]
    fn require_columns_reports_missing() {
        let df = frame(&["Email"]);
        let err = require_columns(&df, "identity", &["Email", "ID number"]).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::Schema { ref column, .. } if column == "ID number"
        ));
    }
}
