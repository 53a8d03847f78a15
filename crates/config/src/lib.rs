//! Configuration loading, validation, and management for chatwhisk.
//!
//! A bot action receives its configuration as the `config` key of its
//! parameters. For local tooling the same structure is loaded from
//! `chatwhisk.toml` (or `$CHATWHISK_CONFIG`) with environment variable
//! overrides. Validates all settings at load.

use chatwhisk_core::payload::get_path;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The root configuration structure.
///
/// Keys outside the known sections are kept in `extra`. Every key the
/// configuration was given, known or not, is readable through
/// [`HelperConfig::lookup`], which is how the config store answers from the
/// environment before asking the datastore.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct HelperConfig {
    /// Action runtime settings
    #[serde(default)]
    pub openwhisk: OpenWhiskConfig,

    /// Remote logger settings
    #[serde(default)]
    pub logger: LoggerConfig,

    /// Conversation-service settings
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Any other configuration keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// The configuration as given, before defaults were filled in
    #[serde(skip)]
    source: Value,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for HelperConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelperConfig")
            .field("openwhisk", &self.openwhisk)
            .field("logger", &self.logger)
            .field("conversation", &self.conversation)
            .field("extra", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct OpenWhiskConfig {
    /// Package the helper actions are deployed in; prefixes every action name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// API host, e.g. `https://openwhisk.example.com`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// `<uuid>:<key>` credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_namespace() -> String {
    "_".into()
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for OpenWhiskConfig {
    fn default() -> Self {
        Self {
            package: None,
            api_host: None,
            namespace: default_namespace(),
            auth: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for OpenWhiskConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWhiskConfig")
            .field("package", &self.package)
            .field("api_host", &self.api_host)
            .field("namespace", &self.namespace)
            .field("auth", &redact(&self.auth))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl OpenWhiskConfig {
    /// Qualify an action name with the configured package.
    pub fn action_name(&self, action: &str) -> String {
        match self.package.as_deref() {
            Some(package) if !package.is_empty() => format!("{package}/{action}"),
            _ => action.to_string(),
        }
    }

    /// Split `auth` into `(uuid, key)`.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.auth.as_deref()?.split_once(':')
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggerConfig {
    #[serde(default)]
    pub level: LogLevel,
}

/// Remote log levels, lowest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    #[serde(alias = "debug")]
    Debug,
    #[default]
    #[serde(alias = "info")]
    Info,
    #[serde(alias = "warn")]
    Warn,
    #[serde(alias = "error")]
    Error,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::ValidationError(format!("unknown log level '{s}'")))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Service name → workspace id
    #[serde(default)]
    pub workspaces: HashMap<String, String>,
}

impl HelperConfig {
    /// Load configuration from the default path (`$CHATWHISK_CONFIG` or
    /// `./chatwhisk.toml`), then apply environment overrides:
    /// - `__OW_API_HOST`, `__OW_NAMESPACE`, `__OW_API_KEY` (set by the action runtime)
    /// - `CHATWHISK_PACKAGE`
    /// - `CHATWHISK_LOG_LEVEL`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let parse_error = |reason: String| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason,
        };
        let source: Value = toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?;
        let mut config: Self =
            serde_json::from_value(source.clone()).map_err(|e| parse_error(e.to_string()))?;
        config.source = source;

        config.validate()?;
        Ok(config)
    }

    /// Read the `config` key of raw action parameters. Absent means defaults.
    pub fn from_params(params: &Value) -> Result<Self, ConfigError> {
        match params.get("config") {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(config) => Self::from_value(config.clone()),
        }
    }

    /// Deserialize and validate a JSON configuration object.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_value(value.clone())
            .map_err(|e| ConfigError::InvalidParams(e.to_string()))?;
        config.source = value;
        config.validate()?;
        Ok(config)
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        std::env::var("CHATWHISK_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("chatwhisk.toml"))
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(host) = var("__OW_API_HOST") {
            self.openwhisk.api_host = Some(host);
        }
        if let Some(namespace) = var("__OW_NAMESPACE") {
            self.openwhisk.namespace = namespace;
        }
        if let Some(auth) = var("__OW_API_KEY") {
            self.openwhisk.auth = Some(auth);
        }
        if let Some(package) = var("CHATWHISK_PACKAGE") {
            self.openwhisk.package = Some(package);
        }
        if let Some(level) = var("CHATWHISK_LOG_LEVEL") {
            self.logger.level = level.parse()?;
        }
        Ok(())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(host) = &self.openwhisk.api_host
            && !host.starts_with("http://")
            && !host.starts_with("https://")
        {
            return Err(ConfigError::ValidationError(format!(
                "openwhisk.api_host must start with http:// or https:// (got '{host}')"
            )));
        }

        if self.openwhisk.auth.is_some() && self.openwhisk.credentials().is_none() {
            return Err(ConfigError::ValidationError(
                "openwhisk.auth must have the form <uuid>:<key>".into(),
            ));
        }

        if self.openwhisk.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "openwhisk.timeout_secs must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Look up a configuration value by dotted key (`greeting`,
    /// `conversation.workspaces.billing`).
    ///
    /// Only keys present in the loaded file or params are found; built-in
    /// defaults and environment overrides are not.
    pub fn lookup(&self, key: &str) -> Option<Value> {
        get_path(&self.source, key).filter(|v| !v.is_null()).cloned()
    }

    /// Workspace id configured for a conversation service.
    pub fn workspace(&self, service: &str) -> Option<&str> {
        self.conversation.workspaces.get(service).map(String::as_str)
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid configuration parameters: {0}")]
    InvalidParams(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for chatwhisk_core::Error {
    fn from(err: ConfigError) -> Self {
        chatwhisk_core::Error::Config {
            message: err.to_string(),
        }
    }
}
