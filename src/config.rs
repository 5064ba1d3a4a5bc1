//! Configuration management for the command line tool.
//!
//! Settings live in an optional TOML file; anything missing falls back to
//! defaults and command line flags override both.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::naming::NamingStyle;
use crate::organize::OrganizationMethod;

const APP_DIR: &str = "image-sorter";
const CONFIG_FILE: &str = "config.toml";

/// Name synthesis defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NamingConfig {
    pub style: NamingStyle,
    /// Prepended to every suggested name as `<prefix>_`
    pub prefix: String,
}

/// Directory scanning defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    pub recursive: bool,
}

/// Folder organization defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OrganizeConfig {
    pub method: OrganizationMethod,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing filter directive, e.g. "info" or "image_sorter=debug"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub naming: NamingConfig,
    pub scan: ScanConfig,
    pub organize: OrganizeConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Gets the configuration directory path.
    ///
    /// - Linux: `~/.config/image-sorter/`
    /// - macOS: `~/Library/Application Support/image-sorter/`
    /// - Windows: `%APPDATA%\image-sorter\`
    pub fn config_dir() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .context("Could not determine user config directory")?;
        Ok(base.join(APP_DIR))
    }

    /// Gets the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Loads configuration from an explicit path, or the default location.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = match Self::default_path() {
                    Ok(path) => path,
                    Err(_) => return Ok(Self::default()),
                };
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Loads and parses a TOML configuration file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid TOML configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.naming.style, NamingStyle::Descriptive);
        assert_eq!(config.organize.method, OrganizationMethod::Content);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            [naming]
            style = "artistic"

            [scan]
            recursive = true
            "#,
        )
        .unwrap();
        assert_eq!(config.naming.style, NamingStyle::Artistic);
        assert_eq!(config.naming.prefix, "");
        assert!(config.scan.recursive);
        assert_eq!(config.organize.method, OrganizationMethod::Content);
    }

    #[test]
    fn test_invalid_style_is_rejected() {
        assert!(Config::parse("[naming]\nstyle = \"poetic\"\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[naming]\nprefix = \"trip\"\n\n[organize]\nmethod = \"format\"\n",
        )
        .unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.naming.prefix, "trip");
        assert_eq!(loaded.organize.method, OrganizationMethod::Format);
        assert_eq!(loaded.logging.level, "warn");
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(Config::load(Some(Path::new("/nonexistent/config.toml"))).is_err());
    }
}
