//! Identifier canonicalization.
//!
//! Every source spells employee identifiers differently: the base sheet keeps
//! them as zero-padded text, spreadsheet exports turn them into floats
//! (`12345.0`), and the identity directory stores them as numbers. All of them
//! are reduced to one canonical zero-padded string before any join.

use polars::prelude::DataFrame;
use timesheet_model::{Identifier, ReconcileError, Result};
use tracing::debug;

use crate::data_utils::text_column;

/// How raw identifier text is interpreted before padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdFormat {
    /// Text identifiers; an all-zero fractional part is dropped.
    Text,
    /// Numeric identifiers; must be a non-negative integer value.
    Numeric,
}

/// Converts raw identifier cells to [`Identifier`]s of a fixed width.
#[derive(Debug, Clone, Copy)]
pub struct IdResolver {
    width: usize,
}

impl IdResolver {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Canonicalize a text identifier.
    ///
    /// `"12345.0"` and `"12345"` both become `"00000012345"`. Padding an
    /// already canonical value returns it unchanged.
    pub fn canonicalize(&self, raw: &str) -> Result<Identifier> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ReconcileError::identifier(raw, "identifier is missing"));
        }
        let natural = strip_zero_fraction(trimmed);
        if natural.is_empty() {
            return Err(ReconcileError::identifier(raw, "identifier has no digits"));
        }
        Ok(Identifier::padded(natural, self.width))
    }

    /// Canonicalize an identifier stored as a number.
    pub fn canonicalize_numeric(&self, raw: &str) -> Result<Identifier> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ReconcileError::identifier(raw, "identifier is missing"));
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            let digits = trimmed.trim_start_matches('0');
            let natural = if digits.is_empty() { "0" } else { digits };
            return Ok(Identifier::padded(natural, self.width));
        }
        let value: f64 = trimmed
            .parse()
            .map_err(|_| ReconcileError::identifier(raw, "not a number"))?;
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
            return Err(ReconcileError::identifier(
                raw,
                "not a non-negative whole number",
            ));
        }
        Ok(Identifier::padded(&format!("{value:.0}"), self.width))
    }

    pub fn canonicalize_as(&self, raw: &str, format: IdFormat) -> Result<Identifier> {
        match format {
            IdFormat::Text => self.canonicalize(raw),
            IdFormat::Numeric => self.canonicalize_numeric(raw),
        }
    }

    /// Canonicalize every cell of an identifier column.
    ///
    /// # Errors
    ///
    /// Fails on the first missing or malformed identifier, naming the table
    /// and the 1-based data row.
    pub fn resolve_column(
        &self,
        df: &DataFrame,
        column: &str,
        table: &str,
        format: IdFormat,
    ) -> Result<Vec<Identifier>> {
        let values = text_column(df, column)?;
        let mut ids = Vec::with_capacity(values.len());
        for (row, value) in values.iter().enumerate() {
            let raw = value.as_deref().unwrap_or("");
            let id = self.canonicalize_as(raw, format).map_err(|err| match err {
                ReconcileError::IdentifierFormat { value, reason } => ReconcileError::identifier(
                    value,
                    format!("{reason} ({table} table, row {})", row + 1),
                ),
                other => other,
            })?;
            ids.push(id);
        }
        debug!(table, column, rows = ids.len(), "resolved identifiers");
        Ok(ids)
    }
}

/// `"5.0"`, `"5.00"` and `"5."` become `"5"`; anything else is returned as is.
fn strip_zero_fraction(value: &str) -> &str {
    match value.split_once('.') {
        Some((whole, fraction)) if fraction.bytes().all(|b| b == b'0') => whole,
        _ => value,
    }
}
