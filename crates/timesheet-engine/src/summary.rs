//! Per-row aggregates appended as summary columns.

use chrono::{Datelike, NaiveDate};
use polars::prelude::{Column, IntoColumn, NamedFrom, Series};
use timesheet_model::{
    DayValue, LabelConfig, LeaveCode, Result, SummaryBuilder, SummaryRow, render_label,
};
use tracing::debug;

use crate::calendar::ReportingPeriod;
use crate::data_utils::rebuild_frame;
use crate::frame::TimesheetFrame;

/// Computes [`SummaryRow`]s and writes them as localized columns.
#[derive(Debug, Clone, Copy)]
pub struct RowSummarizer<'a> {
    labels: &'a LabelConfig,
}

impl<'a> RowSummarizer<'a> {
    pub fn new(labels: &'a LabelConfig) -> Self {
        Self { labels }
    }

    /// Interpret a day cell. Short display codes from an earlier export count
    /// as their leave category.
    pub fn classify(&self, raw: &str) -> Option<DayValue> {
        DayValue::parse(raw).or_else(|| {
            self.labels
                .leave_for_short_code(raw)
                .map(DayValue::Leave)
        })
    }

    /// Aggregate one row given its day cells in column order.
    pub fn summarize_row<'c, I>(&self, cells: I) -> SummaryRow
    where
        I: IntoIterator<Item = (NaiveDate, Option<&'c str>)>,
    {
        let mut builder = SummaryBuilder::new();
        for (date, raw) in cells {
            if let Some(value) = raw.and_then(|raw| self.classify(raw)) {
                builder.record(date.day(), value);
            }
        }
        builder.finish()
    }

    /// Summaries for every row of the frame, in row order.
    pub fn summarize(&self, frame: &TimesheetFrame) -> Result<Vec<SummaryRow>> {
        let mut days = Vec::new();
        for (name, date) in frame.layout().day_columns() {
            days.push((date, frame.column_text(name)?));
        }
        let rows = (0..frame.height())
            .map(|row| {
                self.summarize_row(
                    days.iter()
                        .map(|(date, values)| (*date, values[row].as_deref())),
                )
            })
            .collect();
        Ok(rows)
    }

    /// Rendered summary column names in output order.
    pub fn column_names(&self, period: &ReportingPeriod) -> Vec<String> {
        self.labels
            .summary
            .templates()
            .iter()
            .map(|template| render_label(template, &period.month_name, period.last_day))
            .collect()
    }

    /// Write the summary columns into the frame.
    ///
    /// A column that already carries a summary label, either final or with
    /// the month placeholder still in it, is replaced where it stands; the
    /// others are appended. Day columns are not touched.
    pub fn append(
        &self,
        frame: &mut TimesheetFrame,
        rows: &[SummaryRow],
        period: &ReportingPeriod,
    ) -> Result<Vec<String>> {
        let names = self.column_names(period);
        let summary_columns = summary_columns(&names, rows);
        let templates = self.labels.summary.templates();

        let mut columns: Vec<Column> = frame.data().get_columns().to_vec();
        for ((name, column), template) in names.iter().zip(summary_columns).zip(templates) {
            let placeholders = [
                render_label(template, &self.labels.month_placeholder, period.last_day),
                render_label(template, &self.labels.month_placeholder, 31),
            ];
            let existing = columns.iter().position(|col| {
                let current = col.name().as_str();
                current == name || placeholders.iter().any(|p| p == current)
            });
            match existing {
                Some(idx) => {
                    debug!(column = %name, "replacing existing summary column");
                    columns[idx] = column;
                }
                None => columns.push(column),
            }
        }
        frame.replace_data(rebuild_frame(columns)?);
        Ok(names)
    }
}

fn summary_columns(names: &[String], rows: &[SummaryRow]) -> Vec<Column> {
    let hours = |idx: usize, value: &dyn Fn(&SummaryRow) -> f64| -> Column {
        let values: Vec<f64> = rows.iter().map(value).collect();
        Series::new(names[idx].as_str().into(), values).into_column()
    };
    let counts = |idx: usize, value: &dyn Fn(&SummaryRow) -> i64| -> Column {
        let values: Vec<i64> = rows.iter().map(value).collect();
        Series::new(names[idx].as_str().into(), values).into_column()
    };

    let mut columns = vec![
        hours(0, &|r: &SummaryRow| r.first_half_hours),
        hours(1, &|r: &SummaryRow| r.second_half_hours),
        hours(2, &|r: &SummaryRow| r.month_hours),
        counts(3, &|r: &SummaryRow| r.days_worked),
        counts(4, &|r: &SummaryRow| r.off_days),
    ];
    for (offset, code) in LeaveCode::ALL.into_iter().enumerate() {
        columns.push(counts(5 + offset, &move |r: &SummaryRow| r.leave_days(code)));
    }
    columns.push(counts(10, &|r: &SummaryRow| r.total_non_working_days()));
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn unrecognized_literals_are_ignored() {
        let labels = LabelConfig::georgian();
        let summarizer = RowSummarizer::new(&labels);
        let row = summarizer.summarize_row([
            (date(1), Some("8")),
            (date(2), Some("holiday")),
            (date(3), Some("OFF")),
            (date(4), None),
            (date(16), Some("შვ")),
            (date(17), Some("paid leave")),
        ]);
        assert_eq!(row.month_hours, 8.0);
        assert_eq!(row.days_worked, 1);
        assert_eq!(row.off_days, 1);
        assert_eq!(row.leave_days(LeaveCode::Paid), 2);
        assert_eq!(row.total_non_working_days(), 3);
    }

    #[test]
    fn column_names_embed_month_and_last_day() {
        let labels = LabelConfig::english();
        let summarizer = RowSummarizer::new(&labels);
        let period = ReportingPeriod {
            start: Some(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()),
            month_name: "April".to_string(),
            last_day: 30,
        };
        let names = summarizer.column_names(&period);
        insta::assert_snapshot!(names.join("\n"), @r"
        Hours 1-15 April
        Hours 16-30 April
        Hours April
        Days worked April
        OFF
        Paid leave days
        Unpaid leave days
        Maternity leave days
        Sick leave days
        Mental day off days
        Total non-working days
        ");
    }
}
