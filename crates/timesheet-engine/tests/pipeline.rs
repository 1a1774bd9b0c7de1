//! End-to-end tests for the reconciliation pipeline.

use chrono::{Datelike, NaiveDate};
use polars::prelude::{AnyValue, Column, DataFrame, IntoColumn, NamedFrom, Series};
use timesheet_engine::{SourceTables, reconcile};
use timesheet_model::{LabelConfig, LeaveCode, ReconcileError, ReconcileOptions};

fn text(name: &str, values: &[Option<&str>]) -> Column {
    let owned: Vec<Option<String>> = values.iter().map(|v| v.map(str::to_string)).collect();
    Series::new(name.into(), owned).into_column()
}

fn march_header(day: u32) -> String {
    format!("2024-03-{day:02} 00:00:00")
}

/// Base table for March 2024 with one employee and the given day cells.
fn base_table(id: &str, cells: &[(u32, &str)]) -> DataFrame {
    let mut columns = vec![
        text("ID", &[Some(id)]),
        text("Name", &[Some("Nino")]),
        text("Position", &[Some("Engineer")]),
    ];
    for day in 1..=31 {
        let value = cells.iter().find(|(d, _)| *d == day).map(|(_, v)| *v);
        columns.push(text(&march_header(day), &[value]));
    }
    DataFrame::new(columns).unwrap()
}

fn identity_table(rows: &[(&str, &str)]) -> DataFrame {
    let emails: Vec<Option<&str>> = rows.iter().map(|(e, _)| Some(*e)).collect();
    let ids: Vec<Option<&str>> = rows.iter().map(|(_, i)| Some(*i)).collect();
    DataFrame::new(vec![text("Email", &emails), text("ID number", &ids)]).unwrap()
}

fn leave_table(rows: &[(&str, &str, &str, &str)]) -> DataFrame {
    let emails: Vec<Option<&str>> = rows.iter().map(|r| Some(r.0)).collect();
    let starts: Vec<Option<&str>> = rows.iter().map(|r| Some(r.1)).collect();
    let ends: Vec<Option<&str>> = rows.iter().map(|r| Some(r.2)).collect();
    let types: Vec<Option<&str>> = rows.iter().map(|r| Some(r.3)).collect();
    DataFrame::new(vec![
        text("Email", &emails),
        text("Starts on", &starts),
        text("Ends on", &ends),
        text("Leave Type", &types),
    ])
    .unwrap()
}

fn override_table(id: &str, cells: &[(u32, &str)]) -> DataFrame {
    let mut columns = vec![text("ID", &[Some(id)])];
    for (day, value) in cells {
        columns.push(text(&march_header(*day), &[Some(*value)]));
    }
    DataFrame::new(columns).unwrap()
}

fn english() -> ReconcileOptions {
    ReconcileOptions::default().with_labels(LabelConfig::english())
}

fn cell(df: &DataFrame, name: &str) -> String {
    match df.column(name).unwrap().get(0).unwrap() {
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => panic!("unexpected value in {name}: {other:?}"),
    }
}

fn float(df: &DataFrame, name: &str) -> f64 {
    match df.column(name).unwrap().get(0).unwrap() {
        AnyValue::Float64(v) => v,
        other => panic!("unexpected value in {name}: {other:?}"),
    }
}

fn count(df: &DataFrame, name: &str) -> i64 {
    match df.column(name).unwrap().get(0).unwrap() {
        AnyValue::Int64(v) => v,
        other => panic!("unexpected value in {name}: {other:?}"),
    }
}

#[test]
fn empty_month_gets_calendar_defaults() {
    let tables = SourceTables {
        base: base_table("5", &[]),
        identity: identity_table(&[]),
        leave: leave_table(&[]),
        overrides: override_table("5", &[]),
    };
    let result = reconcile(tables, &english()).unwrap();
    let table = &result.table;

    let weekdays = (1..=31)
        .filter(|d| NaiveDate::from_ymd_opt(2024, 3, *d).unwrap().weekday().num_days_from_monday() < 5)
        .count();
    assert_eq!(weekdays, 21);

    assert_eq!(cell(table, &march_header(1)), "8");
    assert_eq!(cell(table, &march_header(2)), "OFF");
    assert_eq!(float(table, "Hours 1-15 March"), 88.0);
    assert_eq!(float(table, "Hours 16-31 March"), 80.0);
    assert_eq!(float(table, "Hours March"), 8.0 * weekdays as f64);
    assert_eq!(count(table, "Days worked March"), 21);
    assert_eq!(count(table, "OFF"), 10);
    assert_eq!(count(table, "Paid leave days"), 0);
    assert_eq!(count(table, "Total non-working days"), 10);
    assert_eq!(cell(table, "ID"), "0000000****");

    assert_eq!(result.report.employees, 1);
    assert_eq!(result.report.default_cells_filled, 31);
    assert_eq!(result.report.month_name, "March");
    assert_eq!(result.summaries[0].month_hours, 168.0);
}

#[test]
fn base_beats_leave_beats_override() {
    let tables = SourceTables {
        base: base_table("00000000005", &[(4, "6")]),
        identity: identity_table(&[("nino@example.com", "5")]),
        leave: leave_table(&[("Nino@Example.com ", "2024-03-04", "06/03/2024", "Paid leave")]),
        overrides: override_table("5.0", &[(5, "4"), (7, "off"), (8, "swap with Giorgi")]),
    };
    let result = reconcile(tables, &english()).unwrap();
    let table = &result.table;

    assert_eq!(cell(table, &march_header(4)), "6");
    assert_eq!(cell(table, &march_header(5)), "PL");
    assert_eq!(cell(table, &march_header(6)), "PL");
    assert_eq!(cell(table, &march_header(7)), "off");
    assert_eq!(cell(table, &march_header(8)), "8");

    let summary = &result.summaries[0];
    assert_eq!(summary.leave_days(LeaveCode::Paid), 2);
    assert_eq!(summary.off_days, 11);
    assert_eq!(result.report.leave_fill.cells, 2);
    assert_eq!(result.report.override_fill.cells, 1);
    assert_eq!(result.report.override_cells_discarded, 1);
}

#[test]
fn override_off_keeps_its_spelling() {
    let tables = SourceTables {
        base: base_table("5", &[]),
        identity: identity_table(&[]),
        leave: leave_table(&[]),
        overrides: override_table("5", &[(4, " off "), (5, "Off")]),
    };
    let result = reconcile(tables, &english()).unwrap();
    let table = &result.table;

    assert_eq!(cell(table, &march_header(4)), " off ");
    assert_eq!(cell(table, &march_header(5)), "Off");
    assert_eq!(result.summaries[0].off_days, 12);
    assert_eq!(result.report.override_cells_discarded, 0);
}

#[test]
fn work_from_home_does_not_fill() {
    let tables = SourceTables {
        base: base_table("5", &[]),
        identity: identity_table(&[("nino@example.com", "5")]),
        leave: leave_table(&[("nino@example.com", "2024-03-05", "2024-03-05", "Work from home")]),
        overrides: override_table("5", &[]),
    };
    let result = reconcile(tables, &english()).unwrap();
    assert_eq!(cell(&result.table, &march_header(5)), "8");
    assert_eq!(result.report.leave_fill.cells, 0);
}

#[test]
fn unmatched_leave_email_is_reported_not_fatal() {
    let tables = SourceTables {
        base: base_table("5", &[]),
        identity: identity_table(&[("nino@example.com", "5")]),
        leave: leave_table(&[("ghost@example.com", "2024-03-05", "2024-03-06", "Sick leave")]),
        overrides: override_table("5", &[]),
    };
    let result = reconcile(tables, &english()).unwrap();
    assert_eq!(result.report.unmatched_leave_emails, 1);
    assert_eq!(result.summaries[0].leave_days(LeaveCode::Sick), 0);
}

#[test]
fn georgian_labels_and_short_codes() {
    let tables = SourceTables {
        base: base_table("5", &[(11, "Sick leave")]),
        identity: identity_table(&[]),
        leave: leave_table(&[]),
        overrides: override_table("5", &[]),
    };
    let result = reconcile(tables, &ReconcileOptions::default()).unwrap();
    let table = &result.table;
    assert_eq!(cell(table, &march_header(11)), "ბიულ");
    assert_eq!(count(table, "ბიულეტენი"), 1);
    assert_eq!(float(table, "ნამუშევარი საათი 16-31 მარტი"), 80.0);
}

#[test]
fn anonymize_can_be_disabled() {
    let tables = SourceTables {
        base: base_table("5", &[]),
        identity: identity_table(&[]),
        leave: leave_table(&[]),
        overrides: override_table("5", &[]),
    };
    let result = reconcile(tables, &english().with_anonymize(false)).unwrap();
    assert_eq!(cell(&result.table, "ID"), "00000000005");
}

#[test]
fn missing_leave_column_is_a_schema_error() {
    let leave = DataFrame::new(vec![
        text("Email", &[]),
        text("Starts on", &[]),
        text("Leave Type", &[]),
    ])
    .unwrap();
    let tables = SourceTables {
        base: base_table("5", &[]),
        identity: identity_table(&[]),
        leave,
        overrides: override_table("5", &[]),
    };
    let err = reconcile(tables, &english()).unwrap_err();
    assert!(matches!(err, ReconcileError::Schema { ref column, .. } if column == "Ends on"));
}

#[test]
fn unparseable_leave_boundary_is_a_date_error() {
    let tables = SourceTables {
        base: base_table("5", &[]),
        identity: identity_table(&[("nino@example.com", "5")]),
        leave: leave_table(&[("nino@example.com", "next tuesday", "2024-03-06", "Paid leave")]),
        overrides: override_table("5", &[]),
    };
    let err = reconcile(tables, &english()).unwrap_err();
    assert!(matches!(err, ReconcileError::DateParse { ref value, .. } if value == "next tuesday"));
}

#[test]
fn missing_base_identifier_is_fatal() {
    let tables = SourceTables {
        base: base_table("", &[]),
        identity: identity_table(&[]),
        leave: leave_table(&[]),
        overrides: override_table("5", &[]),
    };
    let err = reconcile(tables, &english()).unwrap_err();
    assert!(matches!(err, ReconcileError::IdentifierFormat { .. }));
}
