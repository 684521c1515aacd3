//! Logging setup
//!
//! Installs a `tracing` subscriber writing to stderr and to a daily
//! rolling file. `RUST_LOG` takes precedence over the verbosity flag.

use std::io::IsTerminal;
use std::path::PathBuf;

use thiserror::Error;
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::config_dir;

/// Log file name prefix; files are named `tilestitch.YYYY-MM-DD.log`.
pub const LOG_FILE_PREFIX: &str = "tilestitch";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open log file: {0}")]
    File(String),

    #[error("failed to install subscriber: {0}")]
    Init(String),
}

/// Where and how verbosely to log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub directory: PathBuf,
    pub verbose: bool,
    /// Colour the stderr output. Defaults to whether stderr is a terminal.
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new(config_dir().join("logs"))
    }
}

impl LogConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            verbose: false,
            ansi: std::io::stderr().is_terminal(),
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Filter used when `RUST_LOG` is not set.
    pub fn default_filter(&self) -> String {
        let level = if self.verbose { "debug" } else { "info" };
        format!("warn,tilestitch={0},tilestitch_cli={0}", level)
    }
}

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held
/// for the life of the program.
pub fn init_logging(config: &LogConfig) -> Result<WorkerGuard, LoggingError> {
    std::fs::create_dir_all(&config.directory).map_err(|e| LoggingError::Directory {
        path: config.directory.clone(),
        source: e,
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(&config.directory)
        .map_err(|e| LoggingError::File(e.to_string()))?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter()));
    let timer = LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.ansi)
                .with_target(false)
                .with_timer(timer.clone()),
        )
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_timer(timer),
        )
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(guard)
}
