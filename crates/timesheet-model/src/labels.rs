//! Localized labels for summary columns, month names and leave display codes.
//!
//! Labels are plain configuration handed to the summarizer and relabeler, so
//! the engine carries no locale of its own. Two built-in tables are provided:
//! [`LabelConfig::georgian`] (the default, matching the payroll sheets the
//! tool was written for) and [`LabelConfig::english`]. A JSON file with the
//! same shape can override either.
//!
//! Summary column labels are templates: `{month}` expands to the localized
//! month name of the reporting period and `{last_day}` to its last
//! day-of-month.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::day::LeaveCode;
use crate::error::{ReconcileError, Result};

/// Template placeholder for the localized month name.
pub const MONTH_TOKEN: &str = "{month}";

/// Template placeholder for the last day-of-month of the period.
pub const LAST_DAY_TOKEN: &str = "{last_day}";

/// Column label templates for the appended summary columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLabels {
    pub first_half_hours: String,
    pub second_half_hours: String,
    pub month_hours: String,
    pub days_worked: String,
    pub off_days: String,
    pub paid_leave: String,
    pub unpaid_leave: String,
    pub maternity_leave: String,
    pub sick_leave: String,
    pub mental_day_off: String,
    pub total_non_working_days: String,
}

impl SummaryLabels {
    /// Templates in summary-column order.
    pub fn templates(&self) -> [&str; 11] {
        [
            self.first_half_hours.as_str(),
            self.second_half_hours.as_str(),
            self.month_hours.as_str(),
            self.days_worked.as_str(),
            self.off_days.as_str(),
            self.paid_leave.as_str(),
            self.unpaid_leave.as_str(),
            self.maternity_leave.as_str(),
            self.sick_leave.as_str(),
            self.mental_day_off.as_str(),
            self.total_non_working_days.as_str(),
        ]
    }
}

/// Locale tables used by the summarizer and the relabeler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Month names, January first. Must contain exactly twelve entries.
    pub month_names: Vec<String>,

    /// Month label used when a table has no day columns.
    pub unknown_month: String,

    /// Short display codes written over raw leave labels in the output.
    pub short_codes: BTreeMap<LeaveCode, String>,

    /// Summary column templates.
    pub summary: SummaryLabels,

    /// Column after which the month-suffixed window starts.
    pub anchor_column: String,

    /// Literal month text in base-table headers replaced by the real month.
    pub month_placeholder: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self::georgian()
    }
}

impl LabelConfig {
    pub fn georgian() -> Self {
        Self {
            month_names: [
                "იანვარი",
                "თებერვალი",
                "მარტი",
                "აპრილი",
                "მაისი",
                "ივნისი",
                "ივლისი",
                "აგვისტო",
                "სექტემბერი",
                "ოქტომბერი",
                "ნოემბერი",
                "დეკემბერი",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            unknown_month: "Unknown".to_string(),
            short_codes: BTreeMap::from([
                (LeaveCode::Paid, "შვ".to_string()),
                (LeaveCode::Unpaid, "არ.შვ".to_string()),
                (LeaveCode::Maternity, "დეკ".to_string()),
                (LeaveCode::Sick, "ბიულ".to_string()),
                (LeaveCode::MentalDayOff, "მენ.დღ".to_string()),
            ]),
            summary: SummaryLabels {
                first_half_hours: "ნამუშევარი საათი 1-15 {month}".to_string(),
                second_half_hours: "ნამუშევარი საათი 16-{last_day} {month}".to_string(),
                month_hours: "ნამუშევარი საათი {month}".to_string(),
                days_worked: "ნამუშევარი დღე {month}".to_string(),
                off_days: "OFF".to_string(),
                paid_leave: "ანაზღაურებადი შვებულება".to_string(),
                unpaid_leave: "არა ანაზღაურებადი შვებულება".to_string(),
                maternity_leave: "დეკრეტული".to_string(),
                sick_leave: "ბიულეტენი".to_string(),
                mental_day_off: "Mental Day Off".to_string(),
                total_non_working_days: "სულ არასამუშაო დღე".to_string(),
            },
            anchor_column: "პოზიცია".to_string(),
            month_placeholder: "მარტი".to_string(),
        }
    }

    pub fn english() -> Self {
        Self {
            month_names: [
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            unknown_month: "Unknown".to_string(),
            short_codes: BTreeMap::from([
                (LeaveCode::Paid, "PL".to_string()),
                (LeaveCode::Unpaid, "UL".to_string()),
                (LeaveCode::Maternity, "ML".to_string()),
                (LeaveCode::Sick, "SL".to_string()),
                (LeaveCode::MentalDayOff, "MDO".to_string()),
            ]),
            summary: SummaryLabels {
                first_half_hours: "Hours 1-15 {month}".to_string(),
                second_half_hours: "Hours 16-{last_day} {month}".to_string(),
                month_hours: "Hours {month}".to_string(),
                days_worked: "Days worked {month}".to_string(),
                off_days: "OFF".to_string(),
                paid_leave: "Paid leave days".to_string(),
                unpaid_leave: "Unpaid leave days".to_string(),
                maternity_leave: "Maternity leave days".to_string(),
                sick_leave: "Sick leave days".to_string(),
                mental_day_off: "Mental day off days".to_string(),
                total_non_working_days: "Total non-working days".to_string(),
            },
            anchor_column: "Position".to_string(),
            month_placeholder: "MONTH".to_string(),
        }
    }

    /// Check the tables are complete and the summary labels are distinct.
    pub fn validate(&self) -> Result<()> {
        if self.month_names.len() != 12 {
            return Err(ReconcileError::Config {
                message: format!(
                    "expected 12 month names, found {}",
                    self.month_names.len()
                ),
            });
        }
        let mut seen = BTreeSet::new();
        for template in self.summary.templates() {
            if template.trim().is_empty() {
                return Err(ReconcileError::Config {
                    message: "summary column labels must not be blank".to_string(),
                });
            }
            if !seen.insert(template) {
                return Err(ReconcileError::Config {
                    message: format!("duplicate summary column label '{template}'"),
                });
            }
        }
        Ok(())
    }

    /// Localized name of a 1-based month, falling back to `unknown_month`.
    pub fn month_name(&self, month: u32) -> &str {
        month
            .checked_sub(1)
            .and_then(|idx| self.month_names.get(idx as usize))
            .map_or(self.unknown_month.as_str(), String::as_str)
    }

    /// Short display code for a leave category; the canonical label when unset.
    pub fn short_code(&self, code: LeaveCode) -> &str {
        self.short_codes
            .get(&code)
            .map_or(code.label(), String::as_str)
    }

    /// Reverse lookup of a short display code (case-insensitive, trimmed).
    pub fn leave_for_short_code(&self, raw: &str) -> Option<LeaveCode> {
        let trimmed = raw.trim();
        self.short_codes
            .iter()
            .find(|(_, short)| short.trim().to_lowercase() == trimmed.to_lowercase())
            .map(|(code, _)| *code)
    }
}

/// Expand `{month}` and `{last_day}` in a label template.
pub fn render_label(template: &str, month: &str, last_day: u32) -> String {
    template
        .replace(MONTH_TOKEN, month)
        .replace(LAST_DAY_TOKEN, &last_day.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_validate() {
        LabelConfig::georgian().validate().unwrap();
        LabelConfig::english().validate().unwrap();
    }

    #[test]
    fn month_name_out_of_range_falls_back() {
        let labels = LabelConfig::english();
        assert_eq!(labels.month_name(3), "March");
        assert_eq!(labels.month_name(0), "Unknown");
        assert_eq!(labels.month_name(13), "Unknown");
    }

    #[test]
    fn render_expands_both_tokens() {
        assert_eq!(
            render_label("Hours 16-{last_day} {month}", "April", 30),
            "Hours 16-30 April"
        );
    }
}
