//! Configuration options for timesheet reconciliation.

use serde::{Deserialize, Serialize};

use crate::error::{ReconcileError, Result};
use crate::ids::{IDENTIFIER_MASK, IDENTIFIER_WIDTH};
use crate::labels::LabelConfig;

/// Names of the columns the engine reads from each input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceColumns {
    /// Identifier column of the base table.
    pub base_id: String,
    /// Email column of the identity table.
    pub identity_email: String,
    /// Numeric identifier column of the identity table.
    pub identity_id: String,
    /// Email column of the leave table.
    pub leave_email: String,
    /// First day of a leave interval.
    pub leave_start: String,
    /// Last day of a leave interval (inclusive).
    pub leave_end: String,
    /// Leave category column.
    pub leave_type: String,
    /// Identifier column of the shift override table.
    pub override_id: String,
}

impl Default for SourceColumns {
    fn default() -> Self {
        Self {
            base_id: "ID".to_string(),
            identity_email: "Email".to_string(),
            identity_id: "ID number".to_string(),
            leave_email: "Email".to_string(),
            leave_start: "Starts on".to_string(),
            leave_end: "Ends on".to_string(),
            leave_type: "Leave Type".to_string(),
            override_id: "ID".to_string(),
        }
    }
}

/// Options controlling a reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// Hours assigned to an empty business-day cell.
    pub workday_hours: f64,

    /// Replace the tail of each identifier with a mask in the output.
    pub anonymize: bool,

    /// Width identifiers are zero-padded to before joining.
    pub identifier_width: usize,

    /// Mask appended to anonymized identifiers.
    pub mask: String,

    /// Number of columns after the anchor column whose month placeholder is
    /// replaced with the real month.
    pub rename_window: usize,

    /// Input column names.
    pub columns: SourceColumns,

    /// Locale tables.
    pub labels: LabelConfig,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            workday_hours: 8.0,
            anonymize: true,
            identifier_width: IDENTIFIER_WIDTH,
            mask: IDENTIFIER_MASK.to_string(),
            rename_window: 4,
            columns: SourceColumns::default(),
            labels: LabelConfig::default(),
        }
    }
}

impl ReconcileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_labels(mut self, labels: LabelConfig) -> Self {
        self.labels = labels;
        self
    }

    #[must_use]
    pub fn with_workday_hours(mut self, hours: f64) -> Self {
        self.workday_hours = hours;
        self
    }

    #[must_use]
    pub fn with_anonymize(mut self, enable: bool) -> Self {
        self.anonymize = enable;
        self
    }

    /// Check the options can drive a run.
    pub fn validate(&self) -> Result<()> {
        if !self.workday_hours.is_finite() {
            return Err(ReconcileError::Config {
                message: format!("workday hours must be a finite number, got {}", self.workday_hours),
            });
        }
        if self.identifier_width == 0 {
            return Err(ReconcileError::Config {
                message: "identifier width must be at least 1".to_string(),
            });
        }
        self.labels.validate()
    }

    /// Cell text written into empty business days.
    pub fn workday_value(&self) -> String {
        format!("{}", self.workday_hours)
    }
}
