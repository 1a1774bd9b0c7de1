//! `timesheet` command-line entry point.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::{ColorChoice, Parser};
use timesheet_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::error;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_leave_codes, run_reconcile};
use crate::summary::print_summary;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(err) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "run failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Reconcile(args) => {
            let result = run_reconcile(&args)?;
            print_summary(&result);
        }
        Command::LeaveCodes(args) => run_leave_codes(&args)?,
    }
    Ok(())
}

fn level_filter(level: LogLevelArg) -> LevelFilter {
    match level {
        LogLevelArg::Error => LevelFilter::ERROR,
        LogLevelArg::Warn => LevelFilter::WARN,
        LogLevelArg::Info => LevelFilter::INFO,
        LogLevelArg::Debug => LevelFilter::DEBUG,
        LogLevelArg::Trace => LevelFilter::TRACE,
    }
}

/// `--log-level` beats `-v/-q`, and either one disables `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let explicit = cli.verbosity.is_present() || cli.log_level.is_some();
    let level = cli
        .log_level
        .map_or_else(|| cli.verbosity.tracing_level_filter(), level_filter);
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        use_env_filter: !explicit,
        with_ansi,
        ..LogConfig::default()
    }
    .with_level(level)
    .with_format(format)
    .with_log_file(cli.log_file.clone())
    .with_log_data(cli.log_data)
}
