//! Attendance reconciliation engine.
//!
//! Turns a base timesheet, an identity directory, a leave log and a shift
//! override sheet into one finished monthly table with per-employee
//! summaries. See [`reconcile`] for the stage order.

pub mod calendar;
pub mod data_utils;
pub mod fill;
pub mod frame;
pub mod ids;
pub mod leave;
pub mod merge;
pub mod pipeline;
pub mod relabel;
pub mod shifts;
pub mod summary;

pub use calendar::{ColumnKey, ColumnLayout, ReportingPeriod, is_weekend, parse_date};
pub use fill::DefaultFiller;
pub use frame::TimesheetFrame;
pub use ids::{IdFormat, IdResolver};
pub use leave::{IntervalExpander, LeaveGrid, LeaveGridRow, LeaveInterval};
pub use merge::{FillSource, FillStats, SourceMerger};
pub use pipeline::{ReconcileReport, Reconciled, SourceTables, reconcile};
pub use relabel::{RelabelStats, Relabeler};
pub use shifts::{ShiftGrid, ShiftSanitizer};
pub use summary::RowSummarizer;
