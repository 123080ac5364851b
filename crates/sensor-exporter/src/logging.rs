//! provides logging helpers

use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry;

/// Build a daily rotating, non-blocking writer for `log_file`.
fn file_writer(
    log_file: &Path,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let prefix = log_file
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("log file {} has no usable file name", log_file.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .max_log_files(3)
        .build(dir)
        .with_context(|| format!("failed to create rolling file appender in {}", dir.display()))?;

    Ok(tracing_appender::non_blocking(appender))
}

/// initiate the global tracing subscriber
///
/// Logs always go to stderr; when `log_file` is set they are also written to a
/// daily rotated file. The returned guard must be kept alive to flush the file.
pub fn init<P: AsRef<Path>>(log_file: Option<P>) -> Result<Option<WorkerGuard>> {
    let fmt_layer = utils::logging::get_fmt_layer().with_filter(utils::logging::env_filter());

    let Some(log_file) = log_file else {
        registry().with(fmt_layer).init();
        return Ok(None);
    };

    let (writer, guard) = file_writer(log_file.as_ref())?;
    let file_layer = layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(utils::logging::env_filter());

    registry().with(fmt_layer).with(file_layer).init();
    Ok(Some(guard))
}
