//! Addressable configuration keys for `config get/set/list`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::{expand_tilde, ConfigError, ConfigFile};
use crate::coord::MAX_ZOOM;
use crate::provider::TileLayer;
use crate::scan::EdgePolicy;

/// Every configuration key, addressed as `section.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    DownloadTimeout,
    DownloadParallel,
    DownloadMaxRetries,
    ScanZoom,
    ScanLayer,
    ScanStep,
    ScanEdge,
    ScanFailFast,
    OutputDirectory,
    LoggingDirectory,
}

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::DownloadTimeout,
            ConfigKey::DownloadParallel,
            ConfigKey::DownloadMaxRetries,
            ConfigKey::ScanZoom,
            ConfigKey::ScanLayer,
            ConfigKey::ScanStep,
            ConfigKey::ScanEdge,
            ConfigKey::ScanFailFast,
            ConfigKey::OutputDirectory,
            ConfigKey::LoggingDirectory,
        ]
    }

    /// INI section holding this key.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::DownloadTimeout
            | ConfigKey::DownloadParallel
            | ConfigKey::DownloadMaxRetries => "download",
            ConfigKey::ScanZoom
            | ConfigKey::ScanLayer
            | ConfigKey::ScanStep
            | ConfigKey::ScanEdge
            | ConfigKey::ScanFailFast => "scan",
            ConfigKey::OutputDirectory => "output",
            ConfigKey::LoggingDirectory => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::DownloadTimeout => "timeout",
            ConfigKey::DownloadParallel => "parallel",
            ConfigKey::DownloadMaxRetries => "max_retries",
            ConfigKey::ScanZoom => "zoom",
            ConfigKey::ScanLayer => "layer",
            ConfigKey::ScanStep => "step",
            ConfigKey::ScanEdge => "edge",
            ConfigKey::ScanFailFast => "fail_fast",
            ConfigKey::OutputDirectory | ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as it would be written to the file.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::DownloadTimeout => config.download.timeout_secs.to_string(),
            ConfigKey::DownloadParallel => config.download.parallel.to_string(),
            ConfigKey::DownloadMaxRetries => config.download.max_retries.to_string(),
            ConfigKey::ScanZoom => config.scan.zoom.to_string(),
            ConfigKey::ScanLayer => config.scan.layer.name().to_string(),
            ConfigKey::ScanStep => config.scan.step.to_string(),
            ConfigKey::ScanEdge => config.scan.edge.name().to_string(),
            ConfigKey::ScanFailFast => config.scan.fail_fast.to_string(),
            ConfigKey::OutputDirectory => config.output.directory.display().to_string(),
            ConfigKey::LoggingDirectory => config.logging.directory.display().to_string(),
        }
    }

    /// Validates and stores `value`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = || ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
        };

        match self {
            ConfigKey::DownloadTimeout => {
                config.download.timeout_secs = parse_positive(value).ok_or_else(invalid)?;
            }
            ConfigKey::DownloadParallel => {
                config.download.parallel = parse_positive(value).ok_or_else(invalid)?;
            }
            ConfigKey::DownloadMaxRetries => {
                config.download.max_retries = parse_positive(value).ok_or_else(invalid)?;
            }
            ConfigKey::ScanZoom => {
                config.scan.zoom = value
                    .parse::<u8>()
                    .ok()
                    .filter(|z| *z <= MAX_ZOOM)
                    .ok_or_else(invalid)?;
            }
            ConfigKey::ScanLayer => {
                config.scan.layer = value.parse::<TileLayer>().map_err(|_| invalid())?;
            }
            ConfigKey::ScanStep => {
                config.scan.step = parse_positive(value).ok_or_else(invalid)?;
            }
            ConfigKey::ScanEdge => {
                config.scan.edge = value.parse::<EdgePolicy>().map_err(|_| invalid())?;
            }
            ConfigKey::ScanFailFast => {
                config.scan.fail_fast = parse_bool(value).ok_or_else(invalid)?;
            }
            ConfigKey::OutputDirectory => {
                config.output.directory = non_empty_path(value).ok_or_else(invalid)?;
            }
            ConfigKey::LoggingDirectory => {
                config.logging.directory = non_empty_path(value).ok_or_else(invalid)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

fn parse_positive<T>(value: &str) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    value.parse::<T>().ok().filter(|v| *v > T::default())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    (!value.is_empty()).then(|| expand_tilde(value))
}
