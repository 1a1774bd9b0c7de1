//! Library half of the `timesheet` binary: logging setup and the file-level
//! reconciliation run.

pub mod logging;
pub mod pipeline;
