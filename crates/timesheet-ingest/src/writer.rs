//! CSV output for reconciled tables.

use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Writes a DataFrame to `path` as a UTF-8 CSV with a header row.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|e| IngestError::FileAccess {
        path: path.to_path_buf(),
        source: e,
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|e| IngestError::CsvWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}
