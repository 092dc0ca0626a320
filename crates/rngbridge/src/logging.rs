//! Tracing setup: stderr always, plus an optional plain-text log file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::CliError;

/// Install the global subscriber.
///
/// Filter precedence: `RUST_LOG`, then `-v` flags, then the configured
/// `log_level`, then `warn`. The returned guard must be held until exit
/// so buffered file output is flushed.
pub fn init(
    verbosity: u8,
    configured: Option<&str>,
    log_file: Option<&Path>,
) -> Result<Option<WorkerGuard>, CliError> {
    let directive = match verbosity {
        0 => configured.unwrap_or("warn"),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directive).map_err(|e| CliError::Logging {
            message: format!("invalid log level '{directive}': {e}"),
        })?,
    };

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let name = path.file_name().ok_or_else(|| CliError::Logging {
                message: format!("'{}' is not a file path", path.display()),
            })?;
            std::fs::create_dir_all(dir)?;

            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Logging {
            message: e.to_string(),
        })?;

    Ok(guard)
}
