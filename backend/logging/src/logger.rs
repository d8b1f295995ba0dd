//! Structured Logger
//!
//! Wraps `tracing` to provide human-readable console output on stderr, a
//! daily-rotated plain-text event log, and environment-based level control.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global logger.
///
/// `RUST_LOG` takes precedence over `level`. The event log is written to
/// `<log_dir>/<file_prefix>.YYYY-MM-DD`. Calling this twice is harmless; the
/// first subscriber stays installed.
pub fn init_logger(log_dir: &Path, file_prefix: &str, level: &str) -> Result<()> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, file_prefix);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false);

    // stdout carries the JSON summary in single-document mode.
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    Ok(())
}
