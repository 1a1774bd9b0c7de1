//! Calendar defaults for day cells no source filled.

use timesheet_model::{OFF, Result};
use tracing::debug;

use crate::calendar::is_weekend;
use crate::frame::TimesheetFrame;

/// Fills empty day cells: business days get the workday value, weekends `OFF`.
#[derive(Debug, Clone)]
pub struct DefaultFiller {
    workday_value: String,
}

impl DefaultFiller {
    pub fn new(workday_value: impl Into<String>) -> Self {
        Self {
            workday_value: workday_value.into(),
        }
    }

    /// Fill every empty day cell and return how many were filled.
    pub fn fill(&self, frame: &mut TimesheetFrame) -> Result<usize> {
        let days: Vec<_> = frame
            .layout()
            .day_columns()
            .map(|(name, date)| (name.to_string(), date))
            .collect();

        let mut total = 0usize;
        for (name, date) in days {
            let default = if is_weekend(date) {
                OFF
            } else {
                self.workday_value.as_str()
            };
            let mut values = frame.column_text(&name)?;
            let mut filled = 0usize;
            for cell in values.iter_mut().filter(|cell| cell.is_none()) {
                *cell = Some(default.to_string());
                filled += 1;
            }
            if filled > 0 {
                frame.set_column_text(&name, values)?;
                debug!(column = %name, filled, default, "applied calendar default");
            }
            total += filled;
        }
        Ok(total)
    }
}
