//! Logging infrastructure for formscope
//!
//! CLI invocations log to a daily-rolling file under the XDG state directory
//! (`~/.local/state/formscope/`), keeping stdout free for statistics and
//! export output. Rolled files beyond the configured count are pruned on
//! startup.

use crate::config::{Config, LoggingConfig};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Base name of the log files; the daily appender suffixes a date.
const LOG_FILE_PREFIX: &str = "formscope.log";

/// Initialize the logging system
///
/// Sets up tracing with a daily-rolling file in the XDG state directory.
/// The filter comes from `RUST_LOG` when set, otherwise from the configured
/// level. Returns a guard that must stay alive for the life of the process.
pub fn init(config: &LoggingConfig) -> crate::error::Result<LoggingGuard> {
    let log_dir = Config::state_dir();

    // Create log directory if it doesn't exist
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);

    // Non-blocking writer for better performance
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    prune_rolled_logs(&log_dir, config.max_files);

    tracing::info!(
        log_dir = %log_dir.display(),
        level = %config.level,
        "Logging initialized"
    );

    Ok(LoggingGuard { _guard: guard })
}

/// Delete the oldest rolled log files, keeping at most `keep`.
///
/// The daily appender names files `formscope.log.YYYY-MM-DD`, so sorting the
/// names lexicographically puts the oldest first. Today's active file sorts
/// last and is always kept.
fn prune_rolled_logs(log_dir: &Path, keep: usize) {
    let keep = keep.max(1);
    let Ok(entries) = std::fs::read_dir(log_dir) else {
        return;
    };

    let mut rolled: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| {
                    name.strip_prefix(LOG_FILE_PREFIX)
                        .is_some_and(|rest| rest.starts_with('.'))
                })
        })
        .collect();

    if rolled.len() <= keep {
        return;
    }

    rolled.sort();
    for stale in &rolled[..rolled.len() - keep] {
        if let Err(e) = std::fs::remove_file(stale) {
            tracing::warn!(
                file = %stale.display(),
                error = %e,
                "Failed to prune old log file"
            );
        }
    }
}

/// Initialize logging for tests (logs to stdout)
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

/// Guard that keeps the logging system alive
///
/// When dropped, flushes any pending log writes.
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Returns the log file path
pub fn log_file_path() -> PathBuf {
    Config::log_path()
}
