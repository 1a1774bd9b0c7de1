//! CLI argument definitions for the timesheet reconciler.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "timesheet",
    version,
    about = "Timesheet reconciler - merge base, leave and override tables into one monthly sheet",
    long_about = "Reconcile a monthly base timesheet with leave intervals and hand-maintained\n\
                  shift overrides, fill remaining days from the calendar, append per-employee\n\
                  summaries and write a localized, anonymized CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include emails and identifiers in log output.
    ///
    /// Off by default: row-level values are redacted in every log line.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reconcile the four source tables into one monthly timesheet.
    Reconcile(ReconcileArgs),

    /// List the leave categories with their labels and short codes.
    LeaveCodes(LeaveCodesArgs),
}

#[derive(Parser)]
pub struct ReconcileArgs {
    /// Base timesheet CSV (one row per employee, one column per day).
    #[arg(long = "base", value_name = "CSV")]
    pub base: PathBuf,

    /// Identity directory CSV mapping emails to ID numbers.
    #[arg(long = "identity", value_name = "CSV")]
    pub identity: PathBuf,

    /// Leave intervals CSV.
    #[arg(long = "leave", value_name = "CSV")]
    pub leave: PathBuf,

    /// Shift override CSV.
    #[arg(long = "overrides", value_name = "CSV")]
    pub overrides: PathBuf,

    /// Output CSV (default: <BASE>_reconciled.csv next to the base file).
    #[arg(long = "output", value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// JSON label table overriding the built-in locale.
    #[arg(long = "labels", value_name = "JSON")]
    pub labels: Option<PathBuf>,

    /// Built-in locale for month names, summary headers and short codes.
    #[arg(long = "locale", value_enum, default_value = "georgian")]
    pub locale: LocaleArg,

    /// Hours written into empty business days.
    #[arg(long = "workday-hours", value_name = "HOURS", default_value_t = 8.0)]
    pub workday_hours: f64,

    /// Keep identifiers intact in the output.
    #[arg(long = "no-anonymize")]
    pub no_anonymize: bool,

    /// Also write the expanded leave grid to this CSV.
    #[arg(long = "emit-leave-grid", value_name = "CSV")]
    pub emit_leave_grid: Option<PathBuf>,

    /// Reconcile and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct LeaveCodesArgs {
    /// JSON label table overriding the built-in locale.
    #[arg(long = "labels", value_name = "JSON")]
    pub labels: Option<PathBuf>,

    /// Built-in locale to list short codes for.
    #[arg(long = "locale", value_enum, default_value = "georgian")]
    pub locale: LocaleArg,
}

/// Built-in label tables.
#[derive(Clone, Copy, ValueEnum)]
pub enum LocaleArg {
    Georgian,
    English,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
