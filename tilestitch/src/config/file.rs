//! INI-backed configuration file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;
use tracing::{debug, warn};

use super::keys::ConfigKey;
use crate::mosaic::{MosaicConfig, RetryPolicy, DEFAULT_CONCURRENCY, DEFAULT_MAX_ATTEMPTS};
use crate::provider::{TileLayer, DEFAULT_TIMEOUT_SECS};
use crate::scan::{EdgePolicy, FailurePolicy, ScanConfig, DEFAULT_STEP};

/// Directory under the home directory holding configuration and logs.
pub const CONFIG_DIR_NAME: &str = ".tilestitch";

/// Configuration file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Default zoom level for scans.
const DEFAULT_ZOOM: u8 = 20;

/// Errors reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration syntax: {0}")]
    Parse(String),

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// `[download]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadSettings {
    /// Per-tile timeout in seconds.
    pub timeout_secs: u64,
    /// Concurrent fetches per sub-grid.
    pub parallel: usize,
    /// Attempts per tile, including the first.
    pub max_retries: u32,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            parallel: DEFAULT_CONCURRENCY,
            max_retries: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// `[scan]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSettings {
    pub zoom: u8,
    pub layer: TileLayer,
    pub step: u32,
    pub edge: EdgePolicy,
    pub fail_fast: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            layer: TileLayer::default(),
            step: DEFAULT_STEP,
            edge: EdgePolicy::default(),
            fail_fast: false,
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub directory: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: config_dir().join("logs"),
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub download: DownloadSettings,
    pub scan: ScanSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Loads the file at [`config_file_path`], or defaults if it does not
    /// exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Loads `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&contents)
    }

    /// Parses INI text. Keys that are absent keep their defaults.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let mut config = Self::default();

        for (section, props) in ini.iter() {
            let Some(section) = section else {
                continue;
            };
            for (key, value) in props.iter() {
                let name = format!("{}.{}", section, key);
                match name.parse::<ConfigKey>() {
                    Ok(config_key) => config_key.set(&mut config, value)?,
                    Err(_) => warn!(key = %name, "Ignoring unknown configuration key"),
                }
            }
        }

        Ok(config)
    }

    /// Writes to [`config_file_path`], creating its directory if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Writes to `path`, creating its parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        self.to_ini().write_to_file(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini
    }

    /// Builder settings from the `[download]` section.
    pub fn mosaic_config(&self) -> MosaicConfig {
        MosaicConfig::new()
            .with_tile_timeout(Duration::from_secs(self.download.timeout_secs))
            .with_concurrency(self.download.parallel)
            .with_retry(RetryPolicy::exponential(self.download.max_retries))
    }

    /// Scan settings from the `[scan]` section.
    pub fn scan_config(&self) -> ScanConfig {
        let failure = if self.scan.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::Continue
        };
        ScanConfig::new()
            .with_step(self.scan.step)
            .with_edge(self.scan.edge)
            .with_failure_policy(failure)
    }
}

/// `~/.tilestitch`, or `./.tilestitch` when there is no home directory.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Default configuration file location.
pub fn config_file_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Expands a leading `~` to the home directory.
pub fn expand_tilde(value: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (value.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) if rest.starts_with('/') => home.join(&rest[1..]),
        _ => PathBuf::from(value),
    }
}
