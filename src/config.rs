//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `DEPOT_*` environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::ApiClientConfig;
use crate::notify::ToastConfig;
use crate::scanner::ScannerConfig;
use crate::session::SessionStore;
use crate::table::TableConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub scanner: ScannerConfig,

    #[serde(default)]
    pub table: TableConfig,

    #[serde(default)]
    pub toast: ToastConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_request_timeout() -> u64 {
    30_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ApiClientConfig {
        ApiClientConfig {
            base_url: self.base_url.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Where the login session is kept between runs
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_file")]
    pub file: String,

    /// Keep the session in memory only
    #[serde(default)]
    pub ephemeral: bool,
}

fn default_session_file() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("depot").join("session.json").to_string_lossy().to_string())
        .unwrap_or_else(|| "./depot_session.json".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: default_session_file(),
            ephemeral: false,
        }
    }
}

impl SessionConfig {
    pub fn store(&self) -> SessionStore {
        if self.ephemeral {
            SessionStore::memory()
        } else {
            SessionStore::file(&self.file)
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("depot").join("config.toml")),
            Some(PathBuf::from("/etc/depot/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `DEPOT_*` overrides from any variable lookup
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("DEPOT_API_URL") {
            self.api.base_url = url;
        }
        if let Some(file) = var("DEPOT_SESSION_FILE") {
            self.session.file = file;
        }
        if let Some(test_mode) = var("DEPOT_SCANNER_TEST_MODE") {
            match test_mode.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.scanner.test_mode = true,
                "0" | "false" | "no" | "off" => self.scanner.test_mode = false,
                other => tracing::warn!("Ignoring DEPOT_SCANNER_TEST_MODE={:?}", other),
            }
        }
        if let Some(level) = var("DEPOT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("DEPOT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Depot Configuration
#
# Environment variables override these settings:
# - DEPOT_API_URL
# - DEPOT_SESSION_FILE
# - DEPOT_SCANNER_TEST_MODE
# - DEPOT_LOG_LEVEL
# - DEPOT_LOG_FORMAT

[api]
# Backend base URL (resource paths are appended to it)
base_url = "http://localhost:5000/api"

# Request timeout in milliseconds
request_timeout_ms = 30000

[session]
# Where the login token is kept between runs
# file = "~/.local/share/depot/session.json"

# Keep the session in memory only (log in on every run)
ephemeral = false

[scanner]
# Allow simulated scans (--simulate)
test_mode = true

# Give up when no barcode arrives within this many milliseconds
scan_timeout_ms = 30000

# Keystrokes further apart than this start a new barcode
inter_key_timeout_ms = 100

[table]
# Rows per page until the user picks another size
default_page_size = 25

# Quiet period before a search is sent
search_debounce_ms = 300

[toast]
# How long a notification stays visible
lifetime_ms = 5000

# Oldest notifications are dropped beyond this
max_visible = 5

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
