use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine a configuration directory")]
    NoConfigDir,

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid base_url: {0}")]
    InvalidBaseUrl(String),
}

/// Client settings, read from `config.json` in the platform config dir.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub search_debounce_ms: u64,
    pub delete_toast_ms: u64,
    pub folder_toast_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            search_debounce_ms: 300,
            delete_toast_ms: 1500,
            folder_toast_ms: 1800,
            request_timeout_secs: 10,
        }
    }
}

pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "thundergames", "games-catalog")
}

impl Config {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dirs = project_dirs().ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.json"))
    }

    /// Load from `path`. A missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config: Config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load_from(p),
            None => Self::load_from(&Self::default_path()?),
        }
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Result<Self, ConfigError> {
        if let Some(url) = base_url {
            self.base_url = url;
            self.validate()?;
        }
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        api::parse_base_url(&self.base_url)
            .map(|_| ())
            .map_err(|e| ConfigError::InvalidBaseUrl(e.to_string()))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn delete_toast(&self) -> Duration {
        Duration::from_millis(self.delete_toast_ms)
    }

    pub fn folder_toast(&self) -> Duration {
        Duration::from_millis(self.folder_toast_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.delete_toast(), Duration::from_millis(1500));
        assert_eq!(config.folder_toast(), Duration::from_millis(1800));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"base_url": "https://games.example.org", "search_debounce_ms": 150}}"#).unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.base_url, "https://games.example.org");
        assert_eq!(config.search_debounce_ms, 150);
        assert_eq!(config.delete_toast_ms, 1500);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_base_url_override_is_validated() {
        let config = Config::default()
            .with_base_url(Some("http://10.0.0.2:9000".into()))
            .unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:9000");

        assert!(matches!(
            Config::default().with_base_url(Some("mailto:x@y".into())),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
    }
}
