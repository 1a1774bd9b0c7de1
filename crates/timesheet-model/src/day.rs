//! Day-cell vocabulary: leave categories and parsed day values.
//!
//! A day cell holds either nothing, a number of hours worked, the `OFF`
//! sentinel, or one of the five leave categories. Every other literal is
//! treated as missing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel marking a scheduled day off.
pub const OFF: &str = "OFF";

/// Leave category recorded in a day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveCode {
    Paid,
    Unpaid,
    Maternity,
    Sick,
    MentalDayOff,
}

impl LeaveCode {
    /// All categories in summary-column order.
    pub const ALL: [LeaveCode; 5] = [
        LeaveCode::Paid,
        LeaveCode::Unpaid,
        LeaveCode::Maternity,
        LeaveCode::Sick,
        LeaveCode::MentalDayOff,
    ];

    /// Canonical label as it appears in the leave source and in day cells.
    pub fn label(&self) -> &'static str {
        match self {
            LeaveCode::Paid => "Paid leave",
            LeaveCode::Unpaid => "Unpaid leave",
            LeaveCode::Maternity => "Maternity leave",
            LeaveCode::Sick => "Sick leave",
            LeaveCode::MentalDayOff => "Mental Day Off",
        }
    }

    /// Position of this category in [`LeaveCode::ALL`].
    pub fn index(&self) -> usize {
        match self {
            LeaveCode::Paid => 0,
            LeaveCode::Unpaid => 1,
            LeaveCode::Maternity => 2,
            LeaveCode::Sick => 3,
            LeaveCode::MentalDayOff => 4,
        }
    }

    /// Match a day-cell literal against the canonical labels.
    ///
    /// Case-insensitive and whitespace-trimmed. `Mental Dayoff` is accepted as
    /// an older spelling of `Mental Day Off`.
    pub fn from_label(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "paid leave" => Some(LeaveCode::Paid),
            "unpaid leave" => Some(LeaveCode::Unpaid),
            "maternity leave" => Some(LeaveCode::Maternity),
            "sick leave" => Some(LeaveCode::Sick),
            "mental day off" | "mental dayoff" => Some(LeaveCode::MentalDayOff),
            _ => None,
        }
    }

    /// Normalize a leave-source `Leave Type` value.
    ///
    /// `Work from home` is not leave, `BirthDay off` counts as paid leave, and
    /// unrecognized types are treated as no leave. `None` still overwrites
    /// earlier grid cells during interval expansion.
    pub fn from_leave_type(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "work from home" => None,
            "birthday off" => Some(LeaveCode::Paid),
            _ => Self::from_label(&normalized),
        }
    }
}

impl fmt::Display for LeaveCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LeaveCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("unknown leave category: {s}"))
    }
}

/// A recognized day-cell value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DayValue {
    /// Hours worked. Negative values are accepted unchanged.
    Hours(f64),
    /// Scheduled day off.
    Off,
    /// A leave day.
    Leave(LeaveCode),
}

impl DayValue {
    /// Parse a raw cell literal. Returns `None` for blanks and unrecognized text.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(hours) = parse_hours(trimmed) {
            return Some(DayValue::Hours(hours));
        }
        if is_off(trimmed) {
            return Some(DayValue::Off);
        }
        LeaveCode::from_label(trimmed).map(DayValue::Leave)
    }

    pub fn is_hours(&self) -> bool {
        matches!(self, DayValue::Hours(_))
    }
}

/// Parse a cell as a finite number of hours.
pub fn parse_hours(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// True when the cell is the `OFF` sentinel (case-insensitive, trimmed).
pub fn is_off(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case(OFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leave_type_normalization() {
        assert_eq!(LeaveCode::from_leave_type("Work from home"), None);
        assert_eq!(LeaveCode::from_leave_type("BirthDay off"), Some(LeaveCode::Paid));
        assert_eq!(LeaveCode::from_leave_type(" sick LEAVE "), Some(LeaveCode::Sick));
        assert_eq!(LeaveCode::from_leave_type("Sabbatical"), None);
    }

    #[test]
    fn index_matches_all_order() {
        for (idx, code) in LeaveCode::ALL.iter().enumerate() {
            assert_eq!(code.index(), idx);
        }
    }

    #[test]
    fn non_finite_numbers_are_not_hours() {
        assert_eq!(parse_hours("NaN"), None);
        assert_eq!(parse_hours("inf"), None);
        assert_eq!(parse_hours(" 7.5 "), Some(7.5));
    }
}
