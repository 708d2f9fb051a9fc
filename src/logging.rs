//! File logging through `tracing`.
//!
//! The terminal belongs to the TUI, so log lines go to a file under the
//! state directory (or `logging.file`). `RUST_LOG` overrides the configured
//! level.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LoggingSettings, default_state_dir};

const DEFAULT_FILE_NAME: &str = "songdeck.log";

/// Keeps the background writer alive; pending lines are flushed on drop.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to create log directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid log filter {filter:?}: {source}")]
    Filter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("a global logger is already installed")]
    AlreadyInitialized,
}

/// Where log lines end up for `settings`.
pub fn log_file_path(settings: &LoggingSettings, state_dir: &Path) -> PathBuf {
    match &settings.file {
        Some(p) if p.is_absolute() => p.clone(),
        Some(p) => state_dir.join(p),
        None => state_dir.join(DEFAULT_FILE_NAME),
    }
}

/// `RUST_LOG` when set, the configured level otherwise.
fn env_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|source| LoggingError::Filter {
        filter: level.to_string(),
        source,
    })
}

pub fn init(settings: &LoggingSettings) -> Result<LoggingGuard, LoggingError> {
    let state_dir = default_state_dir().unwrap_or_else(|| PathBuf::from("."));
    let path = log_file_path(settings, &state_dir);
    let dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir).map_err(|source| LoggingError::Directory {
        path: dir.clone(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DEFAULT_FILE_NAME.into());

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = env_filter(&settings.level)?;
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    tracing::info!(path = %path.display(), "logging started");
    Ok(LoggingGuard { _file_guard: guard })
}
