//! # Service Configuration
//!
//! [`ApiConfig`] is read from an optional YAML file and then overridden by
//! environment variables:
//!
//! | Variable          | Field         |
//! |-------------------|---------------|
//! | `ADX_SCHEMA_DIR`  | `schema_dir`  |
//! | `ADX_LOG_FORMAT`  | `log_format`  |
//! | `RUST_LOG`        | `log_filter`  |
//!
//! Validation option presets live in the file only.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use adx_schema::ValidationOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Env var overriding [`ApiConfig::schema_dir`].
pub const ENV_SCHEMA_DIR: &str = "ADX_SCHEMA_DIR";
/// Env var overriding [`ApiConfig::log_format`].
pub const ENV_LOG_FORMAT: &str = "ADX_LOG_FORMAT";
/// Env var overriding [`ApiConfig::log_filter`].
pub const ENV_LOG_FILTER: &str = "RUST_LOG";

/// Errors loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`ApiConfig`].
    #[error("invalid config {path}: {reason}")]
    Parse { path: String, reason: String },

    /// An environment override has an unusable value.
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        })
    }
}

/// Validation service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Directory holding type files and optional `messages.yaml`.
    pub schema_dir: PathBuf,
    /// Log output format.
    pub log_format: LogFormat,
    /// `EnvFilter` directives.
    pub log_filter: String,
    /// Options applied to JSON request bodies.
    pub body_options: ValidationOptions,
    /// Options applied to query strings, whose values always arrive as text.
    pub query_options: ValidationOptions,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            schema_dir: PathBuf::from("schemas"),
            log_format: LogFormat::Pretty,
            log_filter: "info".to_string(),
            body_options: ValidationOptions {
                remove_null: true,
                trim_strings: true,
                ..ValidationOptions::default()
            },
            query_options: ValidationOptions {
                sanitize_integers: true,
                sanitize_booleans: true,
                fill_defaults: true,
                ..ValidationOptions::default()
            },
        }
    }
}

impl ApiConfig {
    /// Parse a YAML config file. Absent keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|reason| ConfigError::Parse {
            path: path.display().to_string(),
            reason,
        })
    }

    fn from_yaml(content: &str) -> Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Defaults, or `path` if given, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(dir) = lookup(ENV_SCHEMA_DIR).filter(|v| !v.trim().is_empty()) {
            self.schema_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup(ENV_LOG_FORMAT) {
            self.log_format = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_LOG_FORMAT,
                value,
            })?;
        }
        if let Some(filter) = lookup(ENV_LOG_FILTER).filter(|v| !v.trim().is_empty()) {
            self.log_filter = filter;
        }
        Ok(self)
    }
}
