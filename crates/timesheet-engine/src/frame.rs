//! The base timesheet as it moves through the pipeline.
//!
//! [`TimesheetFrame`] wraps the base table together with its column layout and
//! the canonical identifier of every row. The identifier column is rewritten
//! to canonical form on construction, so every later join compares like with
//! like.

use polars::prelude::DataFrame;
use timesheet_model::{Identifier, Result};

use crate::calendar::ColumnLayout;
use crate::data_utils::{require_columns, set_text_column, text_column};
use crate::ids::{IdFormat, IdResolver};

/// Base table plus the metadata every stage needs.
#[derive(Debug, Clone)]
pub struct TimesheetFrame {
    data: DataFrame,
    layout: ColumnLayout,
    id_column: String,
    ids: Vec<Identifier>,
}

impl TimesheetFrame {
    /// Wrap the base table, canonicalizing its identifier column.
    ///
    /// # Errors
    ///
    /// Fails if `id_column` is absent or any row has a malformed identifier.
    pub fn from_base(mut data: DataFrame, id_column: &str, resolver: &IdResolver) -> Result<Self> {
        let mut resolved = require_columns(&data, "base", &[id_column])?;
        let id_column = resolved.remove(0);
        let ids = resolver.resolve_column(&data, &id_column, "base", IdFormat::Text)?;
        let canonical = ids.iter().map(|id| Some(id.to_string())).collect();
        set_text_column(&mut data, &id_column, canonical)?;
        let layout = ColumnLayout::classify(&data);
        Ok(Self {
            data,
            layout,
            id_column,
            ids,
        })
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Name of the identifier column as spelled in the table.
    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// Canonical identifier of each row, in row order.
    pub fn ids(&self) -> &[Identifier] {
        &self.ids
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn column_text(&self, name: &str) -> Result<Vec<Option<String>>> {
        text_column(&self.data, name)
    }

    /// Overwrite a column with text values. The layout is unchanged because
    /// the column keeps its name.
    pub fn set_column_text(&mut self, name: &str, values: Vec<Option<String>>) -> Result<()> {
        set_text_column(&mut self.data, name, values)
    }

    /// Swap in a reshaped table (columns added, dropped or renamed) and
    /// reclassify it. Row order must be preserved.
    pub fn replace_data(&mut self, data: DataFrame) {
        self.layout = ColumnLayout::classify(&data);
        self.data = data;
    }

    pub fn into_data(self) -> DataFrame {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_utils::{rebuild_frame, text_series};

    #[test]
    fn canonicalizes_identifier_column() {
        let df = rebuild_frame(vec![
            text_series("id", vec![Some("5".into()), Some("12345.0".into())]),
            text_series("2024-03-01 00:00:00", vec![None, Some("8".into())]),
        ])
        .unwrap();
        let frame = TimesheetFrame::from_base(df, "ID", &IdResolver::new(11)).unwrap();
        assert_eq!(frame.id_column(), "id");
        assert_eq!(
            frame.column_text("id").unwrap(),
            vec![Some("00000000005".into()), Some("00000012345".into())]
        );
        assert_eq!(frame.layout().day_count(), 1);
    }
}
