use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use anyhow::Context;
use tokio::task;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);
const SECS_PER_DAY: u64 = 60 * 60 * 24;

/// Keeps the non-blocking file writer flushing; hold it until exit.
#[allow(dead_code)]
pub struct LoggerGuard(WorkerGuard);

/// Map a configured level onto a filter, `None` if it is not a level name.
fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        _ => None,
    }
}

/// Console + daily rolling file logging. `RUST_LOG` overrides `level`.
///
/// Must be called from inside the tokio runtime: it spawns the task that
/// prunes log files older than `retention_days`.
pub fn init_logging(
    log_dir: impl AsRef<Path>,
    prefix: &str,
    level: &str,
    retention_days: u64,
) -> anyhow::Result<LoggerGuard> {
    let log_dir = log_dir.as_ref().to_path_buf();

    let (default_level, invalid_level) = match parse_level(level) {
        Some(filter) => (filter, None),
        None => (LevelFilter::INFO, Some(level.to_string())),
    };

    let builder = EnvFilter::builder().with_default_directive(default_level.into());
    let rust_log = std::env::var("RUST_LOG").unwrap_or_default();
    let console_filter = builder.clone().parse_lossy(&rust_log);
    let file_filter = builder.parse_lossy(&rust_log);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(&log_dir)
        .with_context(|| format!("Failed to create log appender in {}", log_dir.display()))?;
    let (non_blocking, guard) = NonBlocking::new(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(file_filter);
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(level) = invalid_level {
        tracing::warn!("Invalid log level '{}', defaulting to 'info'", level);
    }

    start_log_cleanup_task(log_dir, prefix.to_string(), retention_max_age(retention_days));

    Ok(LoggerGuard(guard))
}

/// Age past which a log file is deleted; saturates instead of overflowing.
fn retention_max_age(retention_days: u64) -> Duration {
    Duration::from_secs(SECS_PER_DAY.saturating_mul(retention_days))
}

fn start_log_cleanup_task(log_dir: PathBuf, prefix: String, max_age: Duration) {
    task::spawn(async move {
        loop {
            match cleanup_old_logs(&log_dir, &prefix, max_age) {
                Ok(0) => {}
                Ok(deleted) => tracing::info!("Deleted {} old log file(s)", deleted),
                Err(e) => tracing::warn!("Failed to delete old log file: {}", e),
            }
            tokio::time::sleep(CLEANUP_INTERVAL).await;
        }
    });
}

fn cleanup_old_logs(log_dir: &Path, prefix: &str, max_age: Duration) -> std::io::Result<usize> {
    let now = SystemTime::now();
    let mut deleted = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !(file_name.starts_with(prefix) && file_name.ends_with(".log")) {
            continue;
        }

        if let Ok(modified) = fs::metadata(&path)?.modified() {
            if now.duration_since(modified).unwrap_or_default() > max_age {
                fs::remove_file(&path)?;
                tracing::debug!("Old log file deleted: {}", file_name);
                deleted += 1;
            }
        }
    }
    Ok(deleted)
}
