//! Configuration management for sharelink
//!
//! Handles loading and saving configuration from ~/.config/sharelink/config.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::share::expiration::{self, DEFAULT_EXPIRATION};
use crate::share::request::DEFAULT_PASSWORD_LENGTH;
use crate::share::template::DEFAULT_TEMPLATE;
use crate::share::ShareSettings;

/// Configuration file name
const CONFIG_FILE: &str = "config.toml";

/// Application name for config directory
const APP_NAME: &str = "sharelink";

/// Share service used when nothing is configured
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5244";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Base URL of the share service API
    #[serde(default)]
    pub server_url: Option<String>,

    /// Auth token sent with share requests
    #[serde(default)]
    pub token: Option<String>,

    /// Public site URL used to build share links
    #[serde(default)]
    pub site_url: Option<String>,

    /// Site title available to message templates
    #[serde(default)]
    pub site_title: Option<String>,

    /// Message template rendered after a share is created
    #[serde(default)]
    pub share_summary_content: Option<String>,

    /// Expiration token preselected for new shares
    #[serde(default)]
    pub default_expiration: Option<String>,

    /// Base path prefixed to every shared path
    #[serde(default)]
    pub base_path: Option<String>,

    /// Length of generated share passwords
    #[serde(default)]
    pub password_length: Option<usize>,
}

/// Keys accepted by [`Config::set`], in display order
pub const CONFIG_KEYS: &[&str] = &[
    "server_url",
    "token",
    "site_url",
    "site_title",
    "share_summary_content",
    "default_expiration",
    "base_path",
    "password_length",
];

impl Config {
    /// Get the config file path
    ///
    /// Returns ~/.config/sharelink/config.toml on Linux
    pub fn config_path() -> ConfigResult<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Get the config directory path
    pub fn config_dir() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join(APP_NAME))
    }

    /// Load configuration from the default location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check if any configuration is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Set `key` from its string form; `None` clears it
    pub fn set(&mut self, key: &str, value: Option<&str>) -> ConfigResult<()> {
        let text = value.map(str::to_string);
        match key {
            "server_url" => self.server_url = text,
            "token" => self.token = text,
            "site_url" => self.site_url = text,
            "site_title" => self.site_title = text,
            "share_summary_content" => self.share_summary_content = text,
            "default_expiration" => {
                if let Some(ref token) = text {
                    if !expiration::is_valid(token) {
                        return Err(ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: format!("'{}' is not an expiration token", token),
                        });
                    }
                }
                self.default_expiration = text;
            }
            "base_path" => self.base_path = text,
            "password_length" => {
                self.password_length = match value {
                    Some(v) => match v.trim().parse::<usize>() {
                        Ok(len) if len > 0 => Some(len),
                        _ => {
                            return Err(ConfigError::InvalidValue {
                                key: key.to_string(),
                                message: format!("'{}' is not a positive integer", v),
                            })
                        }
                    },
                    None => None,
                };
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Get effective server URL (CLI flag, then config, then default)
    pub fn effective_server_url(&self, cli_server: Option<&str>) -> String {
        cli_server
            .or(self.server_url.as_deref())
            .unwrap_or(DEFAULT_SERVER_URL)
            .to_string()
    }

    /// Get effective base path (CLI flag, then config, then `/`)
    pub fn effective_base_path(&self, cli_base: Option<&str>) -> String {
        cli_base
            .or(self.base_path.as_deref())
            .unwrap_or("/")
            .to_string()
    }

    /// Build share settings from this configuration
    pub fn share_settings(&self) -> ShareSettings {
        ShareSettings {
            site_title: self.site_title.clone().unwrap_or_default(),
            site_url: self.site_url.clone(),
            template: self
                .share_summary_content
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
            default_expiration: self
                .default_expiration
                .clone()
                .unwrap_or_else(|| DEFAULT_EXPIRATION.to_string()),
            password_length: self.password_length.unwrap_or(DEFAULT_PASSWORD_LENGTH),
        }
    }
}

/// Format the configuration for display
pub fn format_config(config: &Config) -> String {
    fn show(value: &Option<String>, fallback: &str) -> String {
        match value {
            Some(v) => format!("\"{}\"", v),
            None => format!("(not set, using {})", fallback),
        }
    }

    let mut lines = Vec::new();

    lines.push("Current configuration:".to_string());
    lines.push(String::new());

    lines.push(format!(
        "  server_url = {}",
        show(&config.server_url, DEFAULT_SERVER_URL)
    ));

    if config.token.is_some() {
        lines.push("  token = \"********\" (set)".to_string());
    } else {
        lines.push("  token = (not set)".to_string());
    }

    lines.push(format!("  site_url = {}", show(&config.site_url, "no link")));
    lines.push(format!("  site_title = {}", show(&config.site_title, "\"\"")));
    lines.push(format!(
        "  share_summary_content = {}",
        show(&config.share_summary_content, "built-in template")
    ));
    lines.push(format!(
        "  default_expiration = {}",
        show(&config.default_expiration, DEFAULT_EXPIRATION)
    ));
    lines.push(format!("  base_path = {}", show(&config.base_path, "/")));

    if let Some(len) = config.password_length {
        lines.push(format!("  password_length = {}", len));
    } else {
        lines.push(format!(
            "  password_length = (not set, using {})",
            DEFAULT_PASSWORD_LENGTH
        ));
    }

    lines.join("\n")
}
