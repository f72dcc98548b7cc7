//! Configuration types for the docchat engine.
//!
//! Configuration lives in a small JSON file (by default
//! `.docchat/config.json`). Every field has a default, so a partial file or
//! no file at all is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the config file and the TUI log.
pub const CONFIG_DIR: &str = ".docchat";

/// Environment variable overriding the server URL.
pub const SERVER_URL_ENV: &str = "DOCCHAT_SERVER_URL";

/// Main configuration for docchat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the document service.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Path of the upload endpoint, relative to the server URL.
    #[serde(default = "default_upload_path")]
    pub upload_path: String,

    /// Path of the question endpoint, relative to the server URL.
    #[serde(default = "default_ask_path")]
    pub ask_path: String,

    /// Timeout in seconds for a single request.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// How many UI ticks a notice stays visible.
    #[serde(default = "default_notice_ticks")]
    pub notice_ticks: usize,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8000".into()
}

fn default_upload_path() -> String {
    "/upload".into()
}

fn default_ask_path() -> String {
    "/ask".into()
}

fn default_timeout() -> u64 {
    120
}

fn default_notice_ticks() -> usize {
    // ~3 seconds at the 4 Hz tick rate
    12
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            upload_path: default_upload_path(),
            ask_path: default_ask_path(),
            timeout_seconds: default_timeout(),
            notice_ticks: default_notice_ticks(),
        }
    }
}

impl Config {
    /// Default config file location under `root`.
    pub fn default_path(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join("config.json")
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Replace the server URL when an override is given.
    #[must_use]
    pub fn with_server_url(mut self, server_url: Option<String>) -> Self {
        if let Some(url) = server_url.filter(|u| !u.trim().is_empty()) {
            self.server_url = url;
        }
        self
    }

    /// Full URL of an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.server_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Full URL of the upload endpoint.
    pub fn upload_url(&self) -> String {
        self.endpoint(&self.upload_path)
    }

    /// Full URL of the question endpoint.
    pub fn ask_url(&self) -> String {
        self.endpoint(&self.ask_path)
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.upload_url(), "http://127.0.0.1:8000/upload");
        assert_eq!(config.ask_url(), "http://127.0.0.1:8000/ask");
        assert_eq!(config.timeout_seconds, 120);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"server_url":"http://docs:9000/"}"#).unwrap();
        assert_eq!(config.ask_url(), "http://docs:9000/ask");
        assert_eq!(config.notice_ticks, 12);
    }

    #[test]
    fn test_endpoint_without_leading_slash() {
        let config = Config {
            ask_path: "api/ask".into(),
            ..Config::default()
        };
        assert_eq!(config.ask_url(), "http://127.0.0.1:8000/api/ask");
    }

    #[test]
    fn test_server_url_override() {
        let config = Config::default().with_server_url(Some("http://other:1".into()));
        assert_eq!(config.server_url, "http://other:1");

        let config = Config::default().with_server_url(Some("  ".into()));
        assert_eq!(config.server_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = Config::default_path(dir.path());
        let config = Config {
            timeout_seconds: 5,
            ..Config::default()
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }
}
