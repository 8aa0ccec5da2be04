//! Logging setup, powered by tracing-subscriber.
//!
//! Library code only emits `tracing` events; binaries call [`init`] once at
//! startup. `RUST_LOG`, when set, replaces the configured directives.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingSettings;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact text: timestamp LEVEL target - message
    Compact,
    /// JSON Lines for structured log shipping
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" | "jsonl" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },

    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Build the filter directive string: base level, quiet third-party crates,
/// then per-target overrides.
pub fn filter_directives(settings: &LoggingSettings) -> String {
    let mut directives = vec![settings.level.clone()];

    let noisy: &[(&str, &str)] = &[("hyper", "warn"), ("tower_http", "info"), ("h2", "warn")];
    for (target, level) in noisy {
        directives.push(format!("{}={}", target, level));
    }

    let mut targets: Vec<_> = settings.targets.iter().collect();
    targets.sort();
    for (target, level) in targets {
        directives.push(format!("{}={}", target, level));
    }

    directives.join(",")
}

fn build_env_filter(settings: &LoggingSettings) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directives = filter_directives(settings);
    EnvFilter::try_new(&directives).map_err(|e| LoggingError::InvalidFilter {
        filter: directives,
        message: e.to_string(),
    })
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean
/// for command output.
pub fn init(settings: &LoggingSettings) -> Result<(), LoggingError> {
    let filter = build_env_filter(settings)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match LogFormat::parse(&settings.format) {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };

    installed.map_err(|e| LoggingError::Install(e.to_string()))
}
