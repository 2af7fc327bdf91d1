//! Configuration loading and validation for Rollcall.
//!
//! Configuration lives in `~/.rollcall/config.toml` and is overridable via
//! environment variables:
//!
//! - `ROLLCALL_TELEGRAM_TOKEN` — bot credential for the Telegram channel
//! - `ROLLCALL_DB` — path to the SQLite database file
//!
//! A missing config file is not an error; defaults are used so that
//! `rollcall run --cli` works out of the box.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use rollcall_engine::HealthPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Environment variable carrying the Telegram bot token.
pub const ENV_TELEGRAM_TOKEN: &str = "ROLLCALL_TELEGRAM_TOKEN";

/// Environment variable overriding the database path.
pub const ENV_DB_PATH: &str = "ROLLCALL_DB";

/// Channel names the loader accepts in `[channels_config]`.
pub const KNOWN_CHANNELS: &[&str] = &["telegram", "cli"];

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    ReadError { path: String, reason: String },

    #[error("Failed to parse config file {path}: {reason}")]
    ParseError { path: String, reason: String },

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Database settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    config_dir().join("rollcall.db").to_string_lossy().into_owned()
}

/// Per-channel settings.
#[derive(Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChannelConfig {
    /// Whether the channel is started by `rollcall run`.
    #[serde(default)]
    pub enabled: bool,

    /// Platform credential. Only the Telegram channel uses this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,

    /// Sender IDs allowed to talk to the bot. Empty = deny all,
    /// `["*"]` = allow all.
    #[serde(default)]
    pub allowed_users: Vec<String>,
}

impl std::fmt::Debug for ChannelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelConfig")
            .field("enabled", &self.enabled)
            .field("bot_token", &self.bot_token.as_ref().map(|_| "[REDACTED]"))
            .field("allowed_users", &self.allowed_users)
            .finish()
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,

    /// Keyed by channel name (`telegram`, `cli`).
    pub channels_config: HashMap<String, ChannelConfig>,

    /// Attendance health thresholds per class type.
    pub policy: HealthPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut channels_config = HashMap::new();
        channels_config.insert("telegram".to_string(), ChannelConfig::default());
        channels_config.insert(
            "cli".to_string(),
            ChannelConfig {
                enabled: true,
                bot_token: None,
                allowed_users: vec!["*".to_string()],
            },
        );

        Self {
            database: DatabaseConfig::default(),
            channels_config,
            policy: HealthPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load from the default location with env overrides applied.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(config_dir().join("config.toml"))
    }

    /// Load from an explicit path, apply env overrides, and validate.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = Self::read(path.as_ref())?;
        config.apply_overrides(
            env::var(ENV_TELEGRAM_TOKEN).ok(),
            env::var(ENV_DB_PATH).ok(),
        );
        config.validate()?;
        Ok(config)
    }

    /// Parse the file at `path`, or fall back to defaults when it is absent.
    fn read(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(path = %path.display(), "No config file found, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        toml::from_str(&raw).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Apply environment overrides on top of the file contents.
    ///
    /// A token override lands on the `telegram` channel entry, creating it
    /// if the file never mentioned one.
    pub fn apply_overrides(&mut self, telegram_token: Option<String>, db_path: Option<String>) {
        if let Some(token) = telegram_token {
            let entry = self
                .channels_config
                .entry("telegram".to_string())
                .or_default();
            entry.bot_token = Some(token);
        }
        if let Some(path) = db_path {
            self.database.path = path;
        }
    }

    /// Check the configuration for internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.path must not be empty".to_string(),
            ));
        }

        for (name, channel) in &self.channels_config {
            if !KNOWN_CHANNELS.contains(&name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "Unknown channel '{}' (expected one of: {})",
                    name,
                    KNOWN_CHANNELS.join(", ")
                )));
            }
            if name == "telegram"
                && channel.enabled
                && channel.bot_token.as_deref().unwrap_or("").trim().is_empty()
            {
                return Err(ConfigError::ValidationError(format!(
                    "Channel 'telegram' is enabled but has no bot_token (set it in the config or via {})",
                    ENV_TELEGRAM_TOKEN
                )));
            }
        }

        for (label, bands) in [
            ("theory", self.policy.theory),
            ("tutorial", self.policy.tutorial),
            ("lab", self.policy.lab),
        ] {
            if !(0.0..=100.0).contains(&bands.critical_below)
                || !(0.0..=100.0).contains(&bands.warning_below)
            {
                return Err(ConfigError::ValidationError(format!(
                    "policy.{} thresholds must be between 0 and 100",
                    label
                )));
            }
            if bands.critical_below > bands.warning_below {
                return Err(ConfigError::ValidationError(format!(
                    "policy.{}: critical_below must not exceed warning_below",
                    label
                )));
            }
        }

        Ok(())
    }

    /// Look up a channel's settings by name.
    pub fn channel(&self, name: &str) -> Option<&ChannelConfig> {
        self.channels_config.get(name)
    }

    /// Names of channels marked enabled, sorted for stable output.
    pub fn enabled_channels(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .channels_config
            .iter()
            .filter(|(_, c)| c.enabled)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Render the default configuration as TOML. `rollcall onboard` uses
    /// this to seed `~/.rollcall/config.toml`.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Directory holding the config file and the default database,
/// `~/.rollcall`.
pub fn config_dir() -> PathBuf {
    dirs_home().join(".rollcall")
}

fn dirs_home() -> PathBuf {
    #[cfg(windows)]
    {
        if let Ok(profile) = env::var("USERPROFILE") {
            return PathBuf::from(profile);
        }
    }
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}
