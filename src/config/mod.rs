//! Configuration Module
//!
//! Handles application configuration loading, validation, and management.
//! The backend origin lives in exactly one place: `[backend] base_url`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Origin used when neither a config file nor the environment names one.
/// Upper bound for `session.max_age_hours` (about a century).
pub const MAX_SESSION_AGE_HOURS: u64 = 24 * 366 * 100;

pub const DEFAULT_BASE_URL: &str = "https://placement-hub-1-xfy2.onrender.com";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend HTTP API
    #[serde(default)]
    pub backend: BackendConfig,

    /// Session token handling
    #[serde(default)]
    pub session: SessionConfig,

    /// Terminal UI behaviour
    #[serde(default)]
    pub ui: UiConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base origin, e.g. "https://placement-hub.example.com"
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Total request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Keep the token on disk between runs
    #[serde(default = "default_true")]
    pub persist: bool,

    /// Session file location
    #[serde(default = "default_session_path")]
    pub path: PathBuf,

    /// Tokens older than this are discarded (None = never)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age_hours: Option<u64>,
}

fn default_true() -> bool {
    true
}

fn default_session_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("placement-hub")
        .join("session.json")
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            persist: true,
            path: default_session_path(),
            max_age_hours: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Delay between the login success notice and the dashboard
    #[serde(default = "default_login_redirect_ms")]
    pub login_redirect_ms: u64,

    /// Delay between the registration success notice and the next screen
    #[serde(default = "default_register_redirect_ms")]
    pub register_redirect_ms: u64,
}

fn default_login_redirect_ms() -> u64 {
    1800
}

fn default_register_redirect_ms() -> u64 {
    2000
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            login_redirect_ms: default_login_redirect_ms(),
            register_redirect_ms: default_register_redirect_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory override
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. Default values
    /// 2. System config: ~/.config/placement-hub/config.toml
    /// 3. Local config: ./placement-hub.toml
    /// 4. Environment variables
    pub fn load() -> Result<Self> {
        tracing::debug!("Loading configuration...");

        let mut config = Self::default();

        if let Some(system_config_path) = Self::system_config_path()
            && system_config_path.exists()
        {
            tracing::debug!("Loading system config from: {:?}", system_config_path);
            config = Self::from_file(&system_config_path)?;
        }

        let local_config_path = Self::local_config_path();
        if local_config_path.exists() {
            tracing::debug!("Loading local config from: {:?}", local_config_path);
            config = Self::from_file(&local_config_path)?;
        }

        config.apply_env_overrides();

        tracing::debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply the environment.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading configuration from custom path: {:?}", path);

        if !path.exists() {
            anyhow::bail!("Config file not found: {:?}", path);
        }

        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Get the system config path: ~/.config/placement-hub/config.toml
    pub fn system_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("placement-hub").join("config.toml"))
    }

    /// Get the local config path: ./placement-hub.toml
    fn local_config_path() -> PathBuf {
        PathBuf::from("./placement-hub.toml")
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&contents).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key/value source (the process environment in
    /// production, a map in tests).
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PLACEMENT_HUB_API_URL") {
            self.backend.base_url = url;
        }

        if let Some(timeout) = lookup("PLACEMENT_HUB_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => self.backend.timeout_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid PLACEMENT_HUB_TIMEOUT_SECS: {}", timeout),
            }
        }

        if let Some(level) = lookup("PLACEMENT_HUB_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(path) = lookup("PLACEMENT_HUB_SESSION_FILE") {
            self.session.path = PathBuf::from(path);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        tracing::debug!("Validating configuration...");

        let base = self.backend.base_url.trim();
        if base.is_empty() {
            anyhow::bail!("backend.base_url is empty");
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            anyhow::bail!(
                "backend.base_url must start with http:// or https://, got: {}",
                base
            );
        }

        if self.backend.timeout_secs == 0 {
            anyhow::bail!("backend.timeout_secs must be greater than zero");
        }

        if let Some(hours) = self.session.max_age_hours
            && hours > MAX_SESSION_AGE_HOURS
        {
            anyhow::bail!(
                "session.max_age_hours must be at most {}, got: {}",
                MAX_SESSION_AGE_HOURS,
                hours
            );
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            );
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        tracing::info!("Configuration saved to: {:?}", path);
        Ok(())
    }
}
