//! CLI error type.

use thiserror::Error;
use tilestitch::config::ConfigError;
use tilestitch::coord::CoordError;
use tilestitch::provider::ProviderError;
use tilestitch::scan::ScanError;

/// Errors surfaced to the user. Every variant exits with status 1.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error(transparent)]
    Coord(#[from] CoordError),

    #[error("could not create HTTP client: {0}")]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("failed to set Ctrl+C handler: {0}")]
    Signal(String),

    #[error("failed to start async runtime: {0}")]
    Runtime(String),

    #[error("{failed} of {total} sub-grids failed")]
    Incomplete { failed: usize, total: usize },

    #[error("download cancelled")]
    Cancelled,
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
