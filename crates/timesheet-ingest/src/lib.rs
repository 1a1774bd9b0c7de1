//! Timesheet table ingestion.
//!
//! Loads the four source tables (base timesheet, identity directory, leave
//! requests, shift overrides) from CSV into Polars DataFrames and writes the
//! reconciled table back out. Workbook formats are out of scope; export each
//! sheet as UTF-8 CSV first.

mod error;
mod polars_utils;
mod reader;
mod writer;

// === Error Types ===
pub use error::{IngestError, Result};

// === Cell Conversion ===
pub use polars_utils::{any_to_string, any_to_string_non_empty, column_text, format_numeric};

// === CSV I/O ===
pub use reader::{read_table, validate_encoding};
pub use writer::write_table;
