//! Error taxonomy for timesheet reconciliation.

use thiserror::Error;

/// Errors that abort a reconciliation run.
///
/// Every variant is unrecoverable at the point of occurrence: the engine does
/// not attempt partial reconciliation on malformed input.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// An identifier could not be canonicalized.
    #[error("cannot canonicalize identifier '{value}': {reason}")]
    IdentifierFormat { value: String, reason: String },

    /// A date-like header or a leave interval boundary could not be parsed.
    #[error("cannot parse date '{value}' in {context}")]
    DateParse { value: String, context: String },

    /// A required column is absent from an input table.
    #[error("required column '{column}' not found in {table} table")]
    Schema { table: String, column: String },

    /// Label or option configuration is unusable.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl ReconcileError {
    pub fn identifier(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::IdentifierFormat {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn date(value: impl Into<String>, context: impl Into<String>) -> Self {
        Self::DateParse {
            value: value.into(),
            context: context.into(),
        }
    }

    pub fn schema(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::Schema {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, ReconcileError>;
