pub mod day;
pub mod error;
pub mod ids;
pub mod labels;
pub mod options;
pub mod privacy;
pub mod summary;

pub use day::{DayValue, LeaveCode, OFF, is_off, parse_hours};
pub use error::{ReconcileError, Result};
pub use ids::{IDENTIFIER_MASK, IDENTIFIER_WIDTH, Identifier, mask_identifier};
pub use labels::{LabelConfig, SummaryLabels, render_label};
pub use options::{ReconcileOptions, SourceColumns};
pub use summary::{FIRST_HALF_LAST_DAY, SummaryBuilder, SummaryRow};
