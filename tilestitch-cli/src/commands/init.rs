//! Init command - create the configuration file.

use std::path::Path;

use tilestitch::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Run the init command.
pub fn run() -> Result<(), CliError> {
    let path = config_file_path();
    let created = init_at(&path)?;

    if created {
        println!("Created configuration file: {}", path.display());
    } else {
        println!("Configuration file already exists: {}", path.display());
    }
    println!();
    println!("Edit this file to customize tilestitch settings.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}

/// Writes a default configuration to `path` unless one exists there.
/// Returns whether a file was created.
fn init_at(path: &Path) -> Result<bool, CliError> {
    if path.exists() {
        // Rewrite through the parser so missing keys show up with defaults
        let config = ConfigFile::load_from(path)?;
        config.save_to(path)?;
        return Ok(false);
    }
    ConfigFile::default().save_to(path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".tilestitch").join("config.ini");

        assert!(init_at(&path).unwrap());
        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_keeps_existing_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[scan]\nzoom = 12\n").unwrap();

        assert!(!init_at(&path).unwrap());

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.scan.zoom, 12);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[download]"));
    }
}
