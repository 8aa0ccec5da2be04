//! Configuration for reportpage.
//!
//! Handles the TOML settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, FlattenSettings, LoggingSettings, PagingSettings, ServerSettings, Settings,
    SettingsError, StoreBackend, StoreSettings, WorkerSettings,
};
