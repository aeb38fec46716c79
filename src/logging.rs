//! File-backed tracing setup.
//!
//! The TUI owns stdout and stderr, so the subscriber writes to a log file
//! only. `RUST_LOG` overrides the configured level for one-off debugging
//! without touching the config file.

use std::fs::OpenOptions;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::AppError;

/// Installs the global subscriber. The returned guard flushes buffered
/// lines on drop; `main` holds it for the life of the process.
pub fn init(config: &LoggingConfig) -> Result<WorkerGuard, AppError> {
    let directive = config
        .level
        .parse()
        .map_err(|e| AppError::Config(format!("logging.level `{}`: {e}", config.level)))?;

    let path = config.file.clone().unwrap_or_else(default_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(directive)
                .from_env_lossy(),
        )
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| AppError::Other(format!("logging init: {e}")))?;

    Ok(guard)
}

fn default_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stencil")
        .join("stencil.log")
}
