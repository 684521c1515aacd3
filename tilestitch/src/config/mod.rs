//! Configuration file support
//!
//! Settings live in `~/.tilestitch/config.ini`. A missing file, section or
//! key falls back to the built-in default; command-line flags override
//! whatever the file says.
//!
//! ```ini
//! [download]
//! timeout = 30
//! parallel = 8
//! max_retries = 3
//!
//! [scan]
//! zoom = 20
//! layer = satellite
//! step = 10
//! edge = clip
//! fail_fast = false
//!
//! [output]
//! directory = .
//!
//! [logging]
//! directory = ~/.tilestitch/logs
//! ```

mod file;
mod keys;

pub use file::{
    config_dir, config_file_path, expand_tilde, ConfigError, ConfigFile, DownloadSettings,
    LoggingSettings, OutputSettings, ScanSettings, CONFIG_DIR_NAME, CONFIG_FILE_NAME,
};
pub use keys::ConfigKey;
