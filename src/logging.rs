//! Tracing subscriber setup.
//!
//! Components log through `tracing` macros; the subscriber is installed once
//! by the binary. Human-facing output stays on stdout, so stderr only carries
//! warnings by default. A full `info` log can be appended to a file.

use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Environment variable naming the directory for the log file.
pub const LOG_DIR_ENV_VAR: &str = "EZCOMMIT_LOG_DIR";

pub const LOG_FILE_NAME: &str = "ezcommit.log";

const DEFAULT_STDERR_LEVEL: &str = "warn";
const DEFAULT_FILE_LEVEL: &str = "info";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Open an append-only log file writer in `dir`.
///
/// Returns `None` (after reporting on stderr) if the file cannot be opened.
pub fn file_writer(dir: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(dir)
    {
        Ok(appender) => Some(tracing_appender::non_blocking(appender)),
        Err(e) => {
            eprintln!(
                "Warning: could not open log file in {}: {}. Continuing without file logging.",
                dir.display(),
                e
            );
            None
        }
    }
}

/// Initialize tracing for the application.
///
/// `RUST_LOG` overrides the default levels. The returned guard must be kept
/// alive for buffered file output to be flushed.
pub fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let (file_layer, guard) = match log_dir.and_then(file_writer) {
        Some((writer, guard)) => (
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(env_filter(DEFAULT_FILE_LEVEL)),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(env_filter(DEFAULT_STDERR_LEVEL));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}
