//! Per-employee monthly aggregates.

use serde::{Deserialize, Serialize};

use crate::day::{DayValue, LeaveCode};

/// Day-of-month that closes the first half of a month.
pub const FIRST_HALF_LAST_DAY: u32 = 15;

/// Aggregates derived from one finalized timesheet row.
///
/// Built once by [`SummaryBuilder::finish`] and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub first_half_hours: f64,
    pub second_half_hours: f64,
    pub month_hours: f64,
    pub days_worked: i64,
    pub off_days: i64,
    leave_days: [i64; 5],
}

impl SummaryRow {
    /// Number of days recorded with the given leave category.
    pub fn leave_days(&self, code: LeaveCode) -> i64 {
        self.leave_days[code.index()]
    }

    /// Sum of all leave and `OFF` counters. Numeric days never contribute.
    pub fn total_non_working_days(&self) -> i64 {
        self.off_days + self.leave_days.iter().sum::<i64>()
    }
}

/// Accumulates day values for one row.
#[derive(Debug, Default)]
pub struct SummaryBuilder {
    row: SummaryRow,
}

impl SummaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the value of one day cell.
    pub fn record(&mut self, day_of_month: u32, value: DayValue) {
        match value {
            DayValue::Hours(hours) => {
                self.row.month_hours += hours;
                if day_of_month <= FIRST_HALF_LAST_DAY {
                    self.row.first_half_hours += hours;
                } else {
                    self.row.second_half_hours += hours;
                }
                self.row.days_worked += 1;
            }
            DayValue::Off => self.row.off_days += 1,
            DayValue::Leave(code) => self.row.leave_days[code.index()] += 1,
        }
    }

    pub fn finish(self) -> SummaryRow {
        self.row
    }
}
