//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! # Log Levels
//!
//! - `error`: fatal errors
//! - `warn`: unmatched leave emails, discarded override cells, skipped renames
//! - `info`: pipeline stage completion with counts and durations
//! - `debug`: per-column detail
//! - `trace`: unused
//!
//! Emails and identifiers are redacted in every level unless `--log-data` is
//! passed.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use timesheet_model::privacy::set_log_data_enabled;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Crates whose events pass the default filter at the configured level.
const WORKSPACE_TARGETS: &[&str] = &[
    "timesheet_cli",
    "timesheet_engine",
    "timesheet_ingest",
    "timesheet_model",
];

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level for workspace crates.
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` override `level_filter`.
    pub use_env_filter: bool,
    pub with_timestamps: bool,
    pub with_target: bool,
    /// Emit span close events with their durations (JSON only).
    pub with_spans: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
    /// Allow emails and identifiers in log output.
    pub log_data: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_timestamps: false,
            with_target: false,
            with_spans: true,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
            log_data: false,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level_filter = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    #[must_use]
    pub fn with_log_data(mut self, enable: bool) -> Self {
        self.log_data = enable;
        self
    }

    /// Filter directives used when `RUST_LOG` is not consulted.
    pub fn directives(&self) -> String {
        default_directives(self.level_filter)
    }
}

/// Install the global subscriber. Call once at startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let writer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stderr),
    };
    set_log_data_enabled(config.log_data);
    tracing_subscriber::registry()
        .with(format_layer(config, writer))
        .with(build_env_filter(config))
        .init();
    Ok(())
}

fn format_layer(config: &LogConfig, writer: BoxMakeWriter) -> BoxedLayer {
    let base = fmt::layer()
        .with_writer(writer)
        .with_target(config.with_target);
    match config.format {
        LogFormat::Json => {
            let spans = if config.with_spans {
                FmtSpan::CLOSE
            } else {
                FmtSpan::NONE
            };
            base.json().with_span_events(spans).boxed()
        }
        LogFormat::Compact if config.with_timestamps => {
            base.compact().with_ansi(config.with_ansi).boxed()
        }
        LogFormat::Compact => base
            .compact()
            .with_ansi(config.with_ansi)
            .without_time()
            .boxed(),
        LogFormat::Pretty if config.with_timestamps => base.with_ansi(config.with_ansi).boxed(),
        LogFormat::Pretty => base.with_ansi(config.with_ansi).without_time().boxed(),
    }
}

/// Default directives: workspace crates at `level`, everything else at warn.
pub fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    std::iter::once("warn".to_string())
        .chain(
            WORKSPACE_TARGETS
                .iter()
                .map(|target| format!("{target}={level}")),
        )
        .collect::<Vec<_>>()
        .join(",")
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    if config.use_env_filter
        && let Ok(filter) = EnvFilter::try_from_default_env()
    {
        return filter;
    }
    EnvFilter::new(config.directives())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_cover_workspace_crates() {
        let directives = default_directives(LevelFilter::DEBUG);
        assert_eq!(
            directives,
            "warn,timesheet_cli=debug,timesheet_engine=debug,timesheet_ingest=debug,timesheet_model=debug"
        );
    }

    #[test]
    fn config_builders_apply() {
        let config = LogConfig::default()
            .with_level(LevelFilter::INFO)
            .with_format(LogFormat::Json)
            .with_log_data(true);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.log_data);
        assert!(config.directives().contains("timesheet_engine=info"));
    }
}
