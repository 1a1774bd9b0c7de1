//! Calendar helpers and day-column classification.
//!
//! A column is a day column iff its header parses as a calendar date. Every
//! table is classified once into metadata and day columns; later stages only
//! look at the classified set, never at column positions. Day columns from
//! different tables are matched by date, so `2024-03-01 00:00:00` in one sheet
//! and `01/03/2024` in another refer to the same day.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use polars::prelude::DataFrame;
use timesheet_model::{LabelConfig, ReconcileError, Result};

/// Timestamp layouts written by spreadsheet exports; only the date part is kept.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Plain date layouts. Ambiguous slash dates are read day-first.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d.%m.%Y", "%d-%m-%Y"];

/// Parse a header or cell as a calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(value.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(value) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(value);
        }
    }
    None
}

/// Parse a value that must be a date.
///
/// # Errors
///
/// Returns [`ReconcileError::DateParse`] with `context` when the value is
/// blank or not a recognized date.
pub fn require_date(raw: Option<&str>, context: &str) -> Result<NaiveDate> {
    let value = raw.unwrap_or("");
    parse_date(value).ok_or_else(|| ReconcileError::date(value, context))
}

/// Saturday and Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Last day-of-month of the month containing `date`.
pub fn last_day_of_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(31, |last| last.day())
}

/// Header text used for generated day columns.
pub fn day_header(date: NaiveDate) -> String {
    date.format("%Y-%m-%d 00:00:00").to_string()
}

/// Every day of `[start, end]`; empty when `start > end`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

/// Key used to match columns across tables.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnKey {
    /// A metadata column, matched by exact name.
    Named(String),
    /// A day column, matched by calendar date.
    Day(NaiveDate),
}

/// One classified column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutColumn {
    pub name: String,
    pub date: Option<NaiveDate>,
}

impl LayoutColumn {
    pub fn key(&self) -> ColumnKey {
        match self.date {
            Some(date) => ColumnKey::Day(date),
            None => ColumnKey::Named(self.name.clone()),
        }
    }
}

/// Column classification of a table, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLayout {
    columns: Vec<LayoutColumn>,
}

impl ColumnLayout {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns = names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                LayoutColumn {
                    name: name.to_string(),
                    date: parse_date(name),
                }
            })
            .collect();
        Self { columns }
    }

    pub fn classify(df: &DataFrame) -> Self {
        Self::from_names(df.get_column_names().iter().map(|name| name.as_str()))
    }

    pub fn columns(&self) -> &[LayoutColumn] {
        &self.columns
    }

    /// Day columns in column order.
    pub fn day_columns(&self) -> impl Iterator<Item = (&str, NaiveDate)> {
        self.columns
            .iter()
            .filter_map(|col| col.date.map(|date| (col.name.as_str(), date)))
    }

    pub fn metadata_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|col| col.date.is_none())
            .map(|col| col.name.as_str())
    }

    pub fn day_count(&self) -> usize {
        self.day_columns().count()
    }

    /// Date of the first day column; defines the reporting month.
    pub fn first_day(&self) -> Option<NaiveDate> {
        self.day_columns().next().map(|(_, date)| date)
    }

    /// Name of the column matching `key`, if the table has one.
    pub fn column_for(&self, key: &ColumnKey) -> Option<&str> {
        self.columns
            .iter()
            .find(|col| match key {
                ColumnKey::Day(date) => col.date == Some(*date),
                ColumnKey::Named(name) => col.date.is_none() && col.name == *name,
            })
            .map(|col| col.name.as_str())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }
}

/// The month a timesheet reports on, as used in column labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportingPeriod {
    /// First day column of the table.
    pub start: Option<NaiveDate>,
    /// Localized month name.
    pub month_name: String,
    /// Last day-of-month of the reporting month.
    pub last_day: u32,
}

impl ReportingPeriod {
    pub fn from_layout(layout: &ColumnLayout, labels: &LabelConfig) -> Self {
        match layout.first_day() {
            Some(start) => Self {
                start: Some(start),
                month_name: labels.month_name(start.month()).to_string(),
                last_day: last_day_of_month(start),
            },
            None => Self {
                start: None,
                month_name: labels.unknown_month.clone(),
                last_day: 31,
            },
        }
    }
}
