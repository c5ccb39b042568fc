//! Application configuration stored as `config.toml` in the app directory.
//!
//! A missing file yields defaults; unknown or missing fields fall back via
//! serde defaults so old configs keep loading as the app evolves.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default OpenFoodFacts host used for product search.
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://world.openfoodfacts.org";

/// UI appearance passed explicitly to UI initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Application settings persisted to TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// UI theme applied at startup.
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub catalog: CatalogSettings,
    /// Override for the ledger database path; defaults to the app directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

/// Settings for the external product catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Base URL of the catalog; the search path is appended to this.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Longest edge, in pixels, used when downscaling product images.
    #[serde(default = "default_image_edge")]
    pub image_edge: u32,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_edge: default_image_edge(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            catalog: CatalogSettings::default(),
            database_path: None,
        }
    }
}

impl AppConfig {
    /// Resolve the ledger database path, honoring the configured override.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(app_dirs::database_path()?),
        }
    }

    /// Parse and validate the configured catalog base URL.
    pub fn catalog_base_url(&self) -> Result<url::Url, ConfigError> {
        url::Url::parse(&self.catalog.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            value: self.catalog.base_url.clone(),
            source,
        })
    }
}

/// Errors raised while loading or saving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    AppDir(#[from] app_dirs::AppDirError),
    #[error("Could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not parse config file {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Could not serialize configuration: {0}")]
    SerializeToml(#[from] toml::ser::Error),
    #[error("Could not write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid catalog base URL '{value}': {source}")]
    InvalidBaseUrl {
        value: String,
        source: url::ParseError,
    },
}

/// Return the path of the config file inside the app directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the configuration, falling back to defaults when no file exists.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    load_from_path(&path)
}

/// Load the configuration from an explicit path.
pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Persist the configuration to the default location.
pub fn save(config: &AppConfig) -> Result<(), ConfigError> {
    save_to_path(config, &config_path()?)
}

/// Persist the configuration to an explicit path.
pub fn save_to_path(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    let data = toml::to_string_pretty(config)?;
    std::fs::write(path, data).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn default_base_url() -> String {
    DEFAULT_CATALOG_BASE_URL.to_string()
}

fn default_image_edge() -> u32 {
    160
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: AppConfig = toml::from_str("theme = \"light\"").unwrap();
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.catalog.base_url, DEFAULT_CATALOG_BASE_URL);
        assert_eq!(config.catalog.image_edge, 160);
        assert!(config.database_path.is_none());
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut config = AppConfig::default();
        config.theme = Theme::Light;
        config.catalog.base_url = "https://example.test".into();
        save_to_path(&config, &path).unwrap();

        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded.theme, Theme::Light);
        assert_eq!(loaded.catalog.base_url, "https://example.test");
    }

    #[test]
    fn rejects_invalid_base_url() {
        let mut config = AppConfig::default();
        config.catalog.base_url = "not a url".into();
        assert!(config.catalog_base_url().is_err());
    }
}
