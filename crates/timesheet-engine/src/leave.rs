//! Leave interval expansion.
//!
//! Leave is recorded as date ranges keyed by email. [`IntervalExpander`] joins
//! each record to the identity directory, then expands the ranges into a
//! sparse per-day grid with one row per email. Expansion happens in input
//! order, so when intervals for the same email overlap the later record wins.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use polars::prelude::DataFrame;
use timesheet_model::privacy::redact_value;
use timesheet_model::{Identifier, LeaveCode, ReconcileError, Result, SourceColumns};
use tracing::{debug, warn};

use crate::calendar::{ColumnKey, day_header, days_inclusive, parse_date, require_date};
use crate::data_utils::{rebuild_frame, require_columns, text_column, text_series};
use crate::ids::{IdFormat, IdResolver};
use crate::merge::FillSource;

/// One leave record after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveInterval {
    pub email: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// `None` for work-from-home and unrecognized types.
    pub leave: Option<LeaveCode>,
    /// Values of the non-interval columns, aligned with
    /// [`LeaveGrid::metadata_columns`].
    pub metadata: Vec<Option<String>>,
}

impl LeaveInterval {
    /// Every day covered by the interval; empty when `start > end`.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        days_inclusive(self.start, self.end)
    }
}

/// One email's row of the expanded grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveGridRow {
    pub email: String,
    /// Identifier resolved through the identity table, if the email matched.
    pub identifier: Option<Identifier>,
    /// Metadata of the first record for this email.
    pub metadata: Vec<Option<String>>,
    /// Days written by at least one interval. `None` means an interval
    /// covered the day without granting leave.
    pub days: BTreeMap<NaiveDate, Option<LeaveCode>>,
}

impl LeaveGridRow {
    pub fn leave_on(&self, date: NaiveDate) -> Option<LeaveCode> {
        self.days.get(&date).copied().flatten()
    }
}

/// Per-day leave grid, one row per distinct email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaveGrid {
    dates: Vec<NaiveDate>,
    rows: Vec<LeaveGridRow>,
    email_column: String,
    id_column: String,
    metadata_columns: Vec<String>,
    interval_count: usize,
}

impl LeaveGrid {
    /// Calendar days from the earliest start to the latest end.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[LeaveGridRow] {
        &self.rows
    }

    pub fn metadata_columns(&self) -> &[String] {
        &self.metadata_columns
    }

    pub fn interval_count(&self) -> usize {
        self.interval_count
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Emails with no identity match. Their leave cannot reach the base table.
    pub fn unmatched_emails(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|row| row.identifier.is_none())
            .map(|row| row.email.as_str())
            .collect()
    }

    /// Render the grid as a table: email, resolved identifier, metadata, then
    /// one column per date.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(2 + self.metadata_columns.len() + self.dates.len());
        columns.push(text_series(
            &self.email_column,
            self.rows.iter().map(|row| Some(row.email.clone())).collect(),
        ));
        columns.push(text_series(
            &self.id_column,
            self.rows
                .iter()
                .map(|row| row.identifier.as_ref().map(Identifier::to_string))
                .collect(),
        ));
        for (idx, name) in self.metadata_columns.iter().enumerate() {
            columns.push(text_series(
                name,
                self.rows
                    .iter()
                    .map(|row| row.metadata.get(idx).cloned().flatten())
                    .collect(),
            ));
        }
        for date in &self.dates {
            columns.push(text_series(
                &day_header(*date),
                self.rows
                    .iter()
                    .map(|row| row.leave_on(*date).map(|code| code.label().to_string()))
                    .collect(),
            ));
        }
        rebuild_frame(columns)
    }
}

impl FillSource for LeaveGrid {
    fn source_name(&self) -> &str {
        "leave"
    }

    fn fill_columns(&self) -> Vec<ColumnKey> {
        let mut keys = Vec::with_capacity(1 + self.metadata_columns.len() + self.dates.len());
        keys.push(ColumnKey::Named(self.email_column.clone()));
        keys.extend(self.metadata_columns.iter().cloned().map(ColumnKey::Named));
        keys.extend(self.dates.iter().copied().map(ColumnKey::Day));
        keys
    }

    fn values_for(&self, key: &ColumnKey) -> HashMap<Identifier, String> {
        let metadata_idx = match key {
            ColumnKey::Named(name) => self.metadata_columns.iter().position(|col| col == name),
            ColumnKey::Day(_) => None,
        };
        let mut values = HashMap::new();
        for row in &self.rows {
            let Some(id) = &row.identifier else {
                continue;
            };
            let value = match key {
                ColumnKey::Day(date) => row.leave_on(*date).map(|code| code.label().to_string()),
                ColumnKey::Named(name) if *name == self.email_column => Some(row.email.clone()),
                ColumnKey::Named(_) => {
                    metadata_idx.and_then(|idx| row.metadata.get(idx).cloned().flatten())
                }
            };
            if let Some(value) = value {
                values.insert(id.clone(), value);
            }
        }
        values
    }
}

/// Expands leave records into a [`LeaveGrid`].
#[derive(Debug, Clone)]
pub struct IntervalExpander {
    columns: SourceColumns,
    resolver: IdResolver,
}

impl IntervalExpander {
    pub fn new(columns: SourceColumns, resolver: IdResolver) -> Self {
        Self { columns, resolver }
    }

    /// Map of lowercased email to canonical identifier.
    ///
    /// Identifiers are numeric in the identity table. The first row for an
    /// email wins; rows without an email are ignored.
    ///
    /// # Errors
    ///
    /// Fails when a required column is missing or an identifier is malformed.
    pub fn identity_map(&self, identity: &DataFrame) -> Result<HashMap<String, Identifier>> {
        let resolved = require_columns(
            identity,
            "identity",
            &[
                self.columns.identity_email.as_str(),
                self.columns.identity_id.as_str(),
            ],
        )?;
        let emails = text_column(identity, &resolved[0])?;
        let ids = self
            .resolver
            .resolve_column(identity, &resolved[1], "identity", IdFormat::Numeric)
            .map_err(|err| match err {
                ReconcileError::IdentifierFormat { value, reason } => ReconcileError::identifier(
                    value,
                    format!(
                        "{reason}; every identity row needs a numeric '{}', \
                         including employees without leave",
                        resolved[1]
                    ),
                ),
                other => other,
            })?;

        let mut map = HashMap::with_capacity(emails.len());
        for (email, id) in emails.into_iter().zip(ids) {
            let Some(email) = email else {
                continue;
            };
            let key = email_key(&email);
            if map.contains_key(&key) {
                debug!(email = redact_value(&key), "duplicate identity email ignored");
                continue;
            }
            map.insert(key, id);
        }
        Ok(map)
    }

    /// Parse the leave table into intervals, in input order.
    ///
    /// Records without an email are skipped. The leave type is normalized;
    /// unknown types become "no leave".
    ///
    /// # Errors
    ///
    /// Fails when a required column is missing or an interval boundary is
    /// blank or not a date.
    pub fn read_intervals(&self, leave: &DataFrame) -> Result<(Vec<String>, Vec<LeaveInterval>)> {
        let resolved = require_columns(
            leave,
            "leave",
            &[
                self.columns.leave_email.as_str(),
                self.columns.leave_start.as_str(),
                self.columns.leave_end.as_str(),
                self.columns.leave_type.as_str(),
            ],
        )?;
        let [email_col, start_col, end_col, type_col] = [
            resolved[0].as_str(),
            resolved[1].as_str(),
            resolved[2].as_str(),
            resolved[3].as_str(),
        ];

        let metadata_columns: Vec<String> = leave
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .filter(|name| {
                ![email_col, start_col, end_col, type_col].contains(&name.as_str())
                    && !name.eq_ignore_ascii_case(&self.columns.identity_id)
                    && parse_date(name).is_none()
            })
            .collect();
        let metadata_values = metadata_columns
            .iter()
            .map(|name| text_column(leave, name))
            .collect::<Result<Vec<_>>>()?;

        let emails = text_column(leave, email_col)?;
        let starts = text_column(leave, start_col)?;
        let ends = text_column(leave, end_col)?;
        let types = text_column(leave, type_col)?;

        let mut intervals = Vec::with_capacity(leave.height());
        for row in 0..leave.height() {
            let Some(email) = emails[row].as_deref().map(str::trim) else {
                warn!(row = row + 1, "leave record without email skipped");
                continue;
            };
            let start = require_date(
                starts[row].as_deref(),
                &format!("leave table '{start_col}' row {}", row + 1),
            )?;
            let end = require_date(
                ends[row].as_deref(),
                &format!("leave table '{end_col}' row {}", row + 1),
            )?;
            let leave_type = types[row].as_deref().and_then(LeaveCode::from_leave_type);
            let metadata = metadata_values
                .iter()
                .map(|values| values[row].clone())
                .collect();
            intervals.push(LeaveInterval {
                email: email.to_string(),
                start,
                end,
                leave: leave_type,
                metadata,
            });
        }
        Ok((metadata_columns, intervals))
    }

    /// Join, parse and expand the leave table.
    pub fn expand(&self, leave: &DataFrame, identity: &DataFrame) -> Result<LeaveGrid> {
        let identities = self.identity_map(identity)?;
        let (metadata_columns, intervals) = self.read_intervals(leave)?;
        let mut grid = Self::expand_intervals(&intervals, &identities);
        grid.email_column = self.columns.leave_email.clone();
        grid.id_column = self.columns.identity_id.clone();
        grid.metadata_columns = metadata_columns;

        for email in grid.unmatched_emails() {
            warn!(
                email = redact_value(email),
                "leave email has no identity match"
            );
        }
        Ok(grid)
    }

    /// Expand parsed intervals against an identity map.
    pub fn expand_intervals(
        intervals: &[LeaveInterval],
        identities: &HashMap<String, Identifier>,
    ) -> LeaveGrid {
        let mut grid = LeaveGrid {
            interval_count: intervals.len(),
            ..LeaveGrid::default()
        };
        let first = intervals.iter().map(|interval| interval.start).min();
        let last = intervals.iter().map(|interval| interval.end).max();
        if let (Some(first), Some(last)) = (first, last) {
            grid.dates = days_inclusive(first, last).collect();
        }

        let mut row_index: HashMap<String, usize> = HashMap::new();
        for interval in intervals {
            let key = email_key(&interval.email);
            let idx = *row_index.entry(key.clone()).or_insert_with(|| {
                grid.rows.push(LeaveGridRow {
                    email: interval.email.clone(),
                    identifier: identities.get(&key).cloned(),
                    metadata: interval.metadata.clone(),
                    days: BTreeMap::new(),
                });
                grid.rows.len() - 1
            });
            let row = &mut grid.rows[idx];
            for day in interval.days() {
                if let Some(previous) = row.days.insert(day, interval.leave)
                    && previous != interval.leave
                {
                    debug!(
                        email = redact_value(&interval.email),
                        %day,
                        "overlapping leave interval overwrote earlier value"
                    );
                }
            }
        }
        grid
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}
