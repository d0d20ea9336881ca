//! File logging. The terminal belongs to the UI, so nothing goes to stdout.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Env var holding the log filter, e.g. `KEYBIND_VIEWER_LOG=debug`.
pub const LOG_ENV: &str = "KEYBIND_VIEWER_LOG";

pub const LOG_FILE: &str = "keybind-viewer.log";

/// Install the global subscriber writing to `dir/keybind-viewer.log`.
///
/// The returned guard flushes pending lines when dropped.
pub fn init(dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    Ok(guard)
}
