//! Tracing subscriber setup: console output plus an optional per-run log file.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use duet_infrastructure::{FileLoggingConfig, LogFormat, run_file_name};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

/// Filter directive forced by the command line, if any.
///
/// `--debug` counts as `-vv`. With neither, `RUST_LOG` or the configured
/// level applies.
pub fn cli_level(verbose: u8, debug: bool) -> Option<&'static str> {
    let verbose = if debug { verbose.max(2) } else { verbose };
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"), // -vvv or more
    }
}

/// Install the global subscriber. The returned guard must live until exit so
/// the file writer flushes.
pub fn init(
    config: &FileLoggingConfig,
    verbose: u8,
    debug: bool,
    started_at: DateTime<Utc>,
) -> Result<Option<WorkerGuard>> {
    let filter = match cli_level(verbose, debug) {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level)),
    };

    let (writer, guard) = match run_log_appender(config, started_at) {
        Some(appender) => {
            let (file, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(std::io::stderr.and(file)), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(writer)
            .try_init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
            .try_init(),
    };
    result.map_err(|e| anyhow!("tracing init failed: {e}"))?;

    Ok(guard)
}

fn run_log_appender(
    config: &FileLoggingConfig,
    started_at: DateTime<Utc>,
) -> Option<RollingFileAppender> {
    let dir = config.dir.as_deref()?;
    match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(run_file_name(started_at, "log"))
        .build(dir)
    {
        Ok(appender) => Some(appender),
        Err(e) => {
            eprintln!("Warning: file logging disabled ({}): {}", dir, e);
            None
        }
    }
}
