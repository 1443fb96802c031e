//! Client configuration

use crate::error::{CampusError, CampusResult, ErrorContext};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for the dashboard client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the REST backend, e.g. `http://localhost:5000/api`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_seconds: 30,
            user_agent: format!("campusdesk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Durable client-side storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one snapshot file per storage key
    pub data_dir: PathBuf,
    /// Key under which the session snapshot is stored
    pub session_key: String,
    /// Key under which the theme snapshot is stored
    pub theme_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|d| d.join(".local").join("share")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("campusdesk");

        Self {
            data_dir,
            session_key: "auth-storage".to_string(),
            theme_key: "theme-storage".to_string(),
        }
    }
}

fn config_err(message: String, operation: &str, suggestion: &str) -> CampusError {
    CampusError::Config {
        message,
        source: None,
        context: ErrorContext::new("config")
            .with_operation(operation)
            .with_suggestion(suggestion),
    }
}

impl PortalConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> CampusResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CampusError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: PortalConfig = toml::from_str(&content).map_err(|e| CampusError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> CampusResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| CampusError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content).map_err(|e| CampusError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> CampusResult<()> {
        let base_url = url::Url::parse(&self.api.base_url).map_err(|e| {
            config_err(
                format!("Invalid api.base_url '{}': {}", self.api.base_url, e),
                "validate",
                "Set api.base_url to an absolute http(s) URL",
            )
        })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(config_err(
                format!("Unsupported api.base_url scheme: {}", base_url.scheme()),
                "validate",
                "Set api.base_url to an absolute http(s) URL",
            ));
        }

        if self.api.timeout_seconds == 0 {
            return Err(config_err(
                "api.timeout_seconds must be greater than 0".to_string(),
                "validate",
                "Set api.timeout_seconds to a positive value",
            ));
        }

        if self.storage.session_key.trim().is_empty() || self.storage.theme_key.trim().is_empty()
        {
            return Err(config_err(
                "Storage keys must not be empty".to_string(),
                "validate",
                "Set storage.session_key and storage.theme_key",
            ));
        }

        if self.storage.session_key == self.storage.theme_key {
            return Err(config_err(
                "storage.session_key and storage.theme_key must differ".to_string(),
                "validate",
                "Use distinct keys so session and theme snapshots do not overwrite each other",
            ));
        }

        Ok(())
    }

    /// Default configuration file locations, most specific first
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|d| d.join("campusdesk").join("config.toml")),
            dirs::home_dir().map(|d| d.join(".campusdesk").join("config.toml")),
            Some(PathBuf::from("campusdesk.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
