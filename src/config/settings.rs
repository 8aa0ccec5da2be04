//! TOML-based configuration for reportpage.
//!
//! Supports a config file (reportpage.toml) with environment variable
//! expansion in store bridge paths, arguments and environment.
//!
//! Example configuration:
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [store]
//! backend = "worker"
//!
//! [store.worker]
//! path = "/opt/reportpage/reportpage-store"
//! args = ["--account", "${ERP_ACCOUNT}"]
//! timeout_secs = 60
//!
//! [store.worker.env]
//! ERP_TOKEN = "${ERP_TOKEN}"
//!
//! [paging]
//! max_pages_to_load = 20
//! legacy_empty_range = true
//!
//! [flatten]
//! key_collision = "reject"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::flatten::KeyCollision;
use crate::query::QueryOptions;
use crate::worker::DEFAULT_TIMEOUT_SECS;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "REPORTPAGE_CONFIG";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub paging: PagingSettings,
    pub flatten: FlattenSettings,
    pub logging: LoggingSettings,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which report store to serve from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// External store bridge process.
    #[default]
    Worker,
    /// JSON fixtures file.
    Fixtures,
}

/// Report store configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: StoreBackend,

    /// Fixtures file, required when `backend = "fixtures"`.
    pub fixtures: Option<String>,

    pub worker: WorkerSettings,
}

/// Store bridge process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerSettings {
    /// Path to the bridge binary (supports ${ENV_VAR} expansion).
    pub path: Option<String>,

    /// Extra command-line arguments.
    pub args: Vec<String>,

    /// Extra environment for the bridge process.
    pub env: HashMap<String, String>,

    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            path: None,
            args: Vec::new(),
            env: HashMap::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Output paging limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PagingSettings {
    /// Largest accepted `pagestoload`.
    pub max_pages_to_load: usize,

    /// Report an empty report's page range as `0--1`.
    pub legacy_empty_range: bool,
}

impl Default for PagingSettings {
    fn default() -> Self {
        let defaults = QueryOptions::default();
        Self {
            max_pages_to_load: defaults.max_pages_to_load,
            legacy_empty_range: defaults.legacy_empty_range,
        }
    }
}

/// Row flattening settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FlattenSettings {
    pub key_collision: KeyCollision,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Base level: trace, debug, info, warn, error.
    pub level: String,

    /// "compact" or "json".
    pub format: String,

    /// Per-target level overrides, e.g. `reportpage::worker = "trace"`.
    pub targets: HashMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
            targets: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `REPORTPAGE_CONFIG`
    /// 2. `./reportpage.toml`
    /// 3. `~/.config/reportpage/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("reportpage.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("reportpage").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Load from `path` when given, else from the default locations.
    pub fn load_from(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.paging.max_pages_to_load == 0 {
            return Err(SettingsError::InvalidConfig(
                "paging.max_pages_to_load must be at least 1".to_string(),
            ));
        }
        if self.store.worker.timeout_secs == 0 {
            return Err(SettingsError::InvalidConfig(
                "store.worker.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.store.backend == StoreBackend::Fixtures && self.store.fixtures.is_none() {
            return Err(SettingsError::InvalidConfig(
                "store.fixtures is required when store.backend = \"fixtures\"".to_string(),
            ));
        }
        Ok(())
    }

    /// Engine options derived from the paging and flatten sections.
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            max_pages_to_load: self.paging.max_pages_to_load,
            legacy_empty_range: self.paging.legacy_empty_range,
            key_collision: self.flatten.key_collision,
        }
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A lone `$` is kept as-is.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.next_if_eq(&'{').is_some() {
            chars.by_ref().take_while(|&ch| ch != '}').collect()
        } else {
            let mut name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
            if name.is_empty() {
                result.push('$');
                continue;
            }
            name
        };

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
