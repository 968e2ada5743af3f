//! Logging and tracing setup.
//!
//! Human-readable events go to stderr. When a log path or directory is
//! configured, events are also written as JSON lines to a file through a
//! non-blocking appender.

use std::path::PathBuf;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Explicit log file path.
const ENV_LOG_PATH: &str = "WORDUSAGE_LOG_PATH";
/// Log directory; the file is named [`LOG_FILE_NAME`].
const ENV_LOG_DIR: &str = "WORDUSAGE_LOG_DIR";
const LOG_FILE_NAME: &str = "wordusage.jsonl";

/// Where file logs go, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Exact file to append to. Wins over `log_dir`.
    pub log_path: Option<PathBuf>,
    /// Directory to create the log file in.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Reads the environment, falling back to the configured directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        let non_empty = |key: &str| std::env::var_os(key).filter(|v| !v.is_empty()).map(PathBuf::from);
        Self {
            log_path: non_empty(ENV_LOG_PATH),
            log_dir: non_empty(ENV_LOG_DIR).or(config_log_dir),
        }
    }

    /// Directory and file name of the log file.
    fn file_target(&self) -> Option<(PathBuf, String)> {
        if let Some(ref path) = self.log_path {
            let name = path.file_name()?.to_string_lossy().into_owned();
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), PathBuf::from);
            return Some((dir, name));
        }
        self.log_dir
            .as_ref()
            .map(|dir| (dir.clone(), LOG_FILE_NAME.to_string()))
    }
}

/// Keeps the file writer alive; drop it last to flush.
#[derive(Debug)]
pub struct ObservabilityGuard {
    _file: Option<WorkerGuard>,
}

/// Builds the event filter.
///
/// `RUST_LOG` wins. Otherwise `-q` means errors only, `-v` debug, `-vv`
/// trace, and without flags the configured level applies.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(level_for(quiet, verbose, default_level))
}

fn level_for(quiet: bool, verbose: u8, default_level: &str) -> &str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => default_level,
        1 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if the log directory cannot be created or a subscriber is
/// already installed.
pub fn init_observability(
    config: &ObservabilityConfig,
    env_filter: EnvFilter,
) -> anyhow::Result<ObservabilityGuard> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let (file_layer, guard) = match config.file_target() {
        Some((dir, name)) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(&dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(ObservabilityGuard { _file: guard })
}
