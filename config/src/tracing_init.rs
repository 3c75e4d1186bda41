//! Tracing subscriber setup shared by the `wayline` CLI and server.
//!
//! Filter comes from `RUST_LOG` (default `info`).

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Logs go to `log_file` (appended, no ANSI) or are dropped, never to the console.
///
/// Keep the returned guard alive for the life of the process; dropping it flushes
/// and stops the background writer.
pub fn init_file_or_sink(
    log_file: Option<&Path>,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
    let filter = env_filter();
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
            tracing::info!(path = %path.display(), "wayline logging to file");
            Ok(Some(guard))
        }
        None => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::sink)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
            Ok(None)
        }
    }
}

/// Logs go to stderr, or to `log_file` when given. Used by the long-running server.
pub fn init_stderr_or_file(
    log_file: Option<&Path>,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
    if log_file.is_some() {
        return init_file_or_sink(log_file);
    }
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(env_filter());
    tracing_subscriber::registry().with(layer).try_init()?;
    Ok(None)
}
