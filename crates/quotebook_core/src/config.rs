//! Quotebook configuration.
//!
//! Loaded from a TOML file. Every section is optional and falls back to
//! defaults, so an empty file is a valid configuration.

use crate::logging::default_log_level;
use crate::store::DEFAULT_COLLECTION_EXTENSION;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "QUOTEBOOK_CONFIG";
/// Environment variable overriding `storage.root`.
pub const ROOT_ENV: &str = "QUOTEBOOK_ROOT";
/// Environment variable overriding `storage.folder`.
pub const FOLDER_ENV: &str = "QUOTEBOOK_FOLDER";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotebookConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

/// Where collections live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the directory-backed blob store.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Folder id or share URL of the folder holding collections.
    #[serde(default)]
    pub folder: Option<String>,
    /// File name marker of collection files.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            folder: None,
            extension: default_extension(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Absolute log directory. File logging is off when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Start random picks with every known tag excluded. On by default;
    /// set to `false` to pick from the whole collection.
    #[serde(default = "default_deny")]
    pub default_deny: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            default_deny: default_deny(),
        }
    }
}

/// Configuration loading failure.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cannot read config: {err}"),
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

impl QuotebookConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        info!(
            "event=config_load module=config status=ok path={}",
            path.display()
        );
        Ok(config)
    }

    /// Like [`QuotebookConfig::load`], falling back to defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                warn!(
                    "event=config_load module=config status=fallback path={} error={}",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Applies `QUOTEBOOK_ROOT` / `QUOTEBOOK_FOLDER` when set.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var_os(ROOT_ENV).map(PathBuf::from),
            std::env::var(FOLDER_ENV).ok(),
        );
    }

    /// Applies explicit overrides; blank values are ignored.
    pub fn apply_overrides(&mut self, root: Option<PathBuf>, folder: Option<String>) {
        if let Some(root) = root.filter(|root| !root.as_os_str().is_empty()) {
            self.storage.root = root;
        }
        if let Some(folder) = folder.filter(|folder| !folder.trim().is_empty()) {
            self.storage.folder = Some(folder);
        }
    }
}

/// Config path: explicit path, then `QUOTEBOOK_CONFIG`, then `~/.quotebook/config.toml`.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    home_dir()
        .map(|home| home.join(".quotebook").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("quotebook.toml"))
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let var = "USERPROFILE";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";
    std::env::var_os(var).map(PathBuf::from)
}

fn default_root() -> PathBuf {
    home_dir()
        .map(|home| home.join(".quotebook").join("store"))
        .unwrap_or_else(|| PathBuf::from("quotebook-store"))
}

fn default_extension() -> String {
    DEFAULT_COLLECTION_EXTENSION.to_string()
}

fn default_deny() -> bool {
    true
}

fn default_level() -> String {
    default_log_level().to_string()
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, QuotebookConfig};
    use std::path::PathBuf;

    #[test]
    fn empty_file_yields_defaults() {
        let config = QuotebookConfig::from_toml("").unwrap();
        assert_eq!(config, QuotebookConfig::default());
        assert_eq!(config.storage.extension, ".db");
        assert!(config.filter.default_deny);
    }

    #[test]
    fn filter_default_deny_can_be_switched_off() {
        let config = QuotebookConfig::from_toml("[filter]\ndefault_deny = false").unwrap();
        assert!(!config.filter.default_deny);
        assert_eq!(config.storage, QuotebookConfig::default().storage);
    }

    #[test]
    fn sections_override_defaults() {
        let config = QuotebookConfig::from_toml(
            r#"
            [storage]
            root = "/srv/quotes"
            folder = "https://drive.example.com/drive/folders/abc"

            [logging]
            level = "warn"
            dir = "/var/log/quotebook"

            [filter]
            default_deny = true
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.root, PathBuf::from("/srv/quotes"));
        assert_eq!(config.logging.level, "warn");
        assert!(config.filter.default_deny);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = QuotebookConfig::from_toml("[storage\nroot = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = QuotebookConfig::load_or_default(&dir.path().join("absent.toml"));
        assert_eq!(config, QuotebookConfig::default());
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let mut config = QuotebookConfig::default();
        config.apply_overrides(Some(PathBuf::from("/tmp/q")), Some("  ".to_string()));
        assert_eq!(config.storage.root, PathBuf::from("/tmp/q"));
        assert_eq!(config.storage.folder, None);
    }
}
