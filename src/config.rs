//! User configuration and preferences.
//!
//! The file is only ever read. Values in it act as defaults that command
//! line flags override.

use crate::error::{FilerError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Overrides the config file location
pub const CONFIG_ENV: &str = "FILER_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Default destination for kept files
    pub target: Option<PathBuf>,
    /// Default filename pattern
    pub pattern: Option<String>,
    /// Where to write the log
    pub log_file: Option<PathBuf>,
    /// Ask before every delete
    pub confirm_delete: bool,
    /// Ignore dot-files
    pub skip_hidden: bool,
}

impl UserConfig {
    /// Get the config file path ($FILER_CONFIG or ~/.config/filer/config.json)
    pub fn config_path() -> Option<PathBuf> {
        match env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => dirs::config_dir().map(|dir| dir.join("filer").join("config.json")),
        }
    }

    /// Load config from the default location; a missing file yields defaults
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok_or_else(|| {
            FilerError::ConfigError("Could not determine config directory".to_string())
        })?;

        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            FilerError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            FilerError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = UserConfig::default();
        assert!(config.target.is_none());
        assert!(config.pattern.is_none());
        assert!(!config.confirm_delete);
        assert!(!config.skip_hidden);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = UserConfig::load_from(&temp_dir.path().join("nope.json")).unwrap();
        assert_eq!(config, UserConfig::default());
    }

    #[test]
    fn test_partial_config_is_filled_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{ "target": "/srv/keep", "confirm_delete": true }"#).unwrap();

        let config = UserConfig::load_from(&path).unwrap();

        assert_eq!(config.target, Some(PathBuf::from("/srv/keep")));
        assert!(config.confirm_delete);
        assert!(config.pattern.is_none());
        assert!(!config.skip_hidden);
    }

    #[test]
    fn test_broken_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let result = UserConfig::load_from(&path);

        assert!(matches!(result, Err(FilerError::ConfigError(_))));
    }

    #[test]
    fn test_config_path_honours_env() {
        env::set_var(CONFIG_ENV, "/tmp/filer-test-config.json");
        let path = UserConfig::config_path();
        env::remove_var(CONFIG_ENV);

        assert_eq!(path, Some(PathBuf::from("/tmp/filer-test-config.json")));
    }
}
