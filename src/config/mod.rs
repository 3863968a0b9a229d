//! Configuration management for collection-watch
//!
//! This module handles loading, parsing, and validating application configuration
//! from YAML files. Filter lists left empty impose no restriction.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::Repository;

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.yml";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Automation Hub endpoint and credentials
    #[serde(default)]
    pub hub: HubConfig,

    /// Namespaces to report on (empty = all)
    #[serde(default)]
    pub namespaces: Vec<String>,

    /// Repositories to report on: `validated` and/or `certified` (empty = both)
    #[serde(default)]
    pub repositories: Vec<String>,

    /// Collections to report on, by name or FQCN (empty = all)
    #[serde(default)]
    pub collections: Vec<String>,

    /// strftime pattern used to render dates in the report
    #[serde(default = "default_output_date_format")]
    pub output_date_format: String,

    /// Use the highest version's own timestamp for the window check
    #[serde(default)]
    pub resolve_version_dates: bool,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileRead(format!("{}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(yaml);
        let config: Option<Config> = serde_yaml::from_str(&expanded)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse YAML: {}", e)))?;
        // An empty document deserializes to None
        Ok(config.unwrap_or_default())
    }

    /// Check the values that serde cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hub.validate()?;

        for repository in &self.repositories {
            repository.parse::<Repository>().map_err(|_| {
                ConfigError::InvalidValue(format!(
                    "repositories: unknown repository '{}' (expected 'validated' or 'certified')",
                    repository
                ))
            })?;
        }

        if StrftimeItems::new(&self.output_date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidValue(format!(
                "output_date_format: invalid pattern '{}'",
                self.output_date_format
            )));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hub: HubConfig::default(),
            namespaces: Vec::new(),
            repositories: Vec::new(),
            collections: Vec::new(),
            output_date_format: default_output_date_format(),
            resolve_version_dates: false,
            logging: LoggingConfig::default(),
        }
    }
}

fn default_output_date_format() -> String {
    "%Y-%m-%d".to_string()
}

/// Automation Hub connection configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HubConfig {
    /// Base URL of the API
    #[serde(default = "default_hub_url")]
    pub url: String,

    /// Username for basic auth
    pub username: Option<String>,

    /// Password for basic auth
    pub password: Option<String>,

    /// Bearer token, used instead of basic auth when set
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Number of collections requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            url: default_hub_url(),
            username: None,
            password: None,
            token: None,
            timeout_secs: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

impl HubConfig {
    /// Resolve the credentials to use, preferring a token over basic auth
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(Credentials::Token(token.to_string()));
        }

        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(password)) if !user.is_empty() => Ok(Credentials::Basic {
                username: user.to_string(),
                password: password.to_string(),
            }),
            (Some(user), None) if !user.is_empty() => {
                Err(ConfigError::MissingRequired("hub.password".to_string()))
            }
            _ => Err(ConfigError::MissingRequired(
                "hub.token or hub.username/hub.password".to_string(),
            )),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(format!(
                "hub.url: expected an http(s) URL, got '{}'",
                self.url
            )));
        }
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue(
                "hub.page_size must be greater than 0".to_string(),
            ));
        }
        self.credentials().map(|_| ())
    }
}

fn default_hub_url() -> String {
    "https://console.redhat.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    100
}

/// Resolved API credentials
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// HTTP basic auth
    Basic { username: String, password: String },
    /// Bearer token
    Token(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Credentials::Token(_) => f.debug_tuple("Token").field(&"***").finish(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// Configuration error types
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Error reading configuration file
    #[error("Failed to read configuration file: {0}")]
    FileRead(String),

    /// Error parsing configuration
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

/// Expand environment variables in a string
///
/// Supports `${VAR_NAME}` syntax. Unset variables are left untouched.
fn expand_env_vars(input: &str) -> String {
    let re = regex_lite::Regex::new(r"\$\{([^}]+)\}")
        .expect("Invalid regex pattern for environment variable expansion");

    re.replace_all(input, |caps: &regex_lite::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
    })
    .into_owned()
}
