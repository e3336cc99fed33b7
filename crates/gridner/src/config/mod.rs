//! Application configuration.
//!
//! Settings come from an optional TOML file and are then overridden by
//! `GRIDNER_*` environment variables. Provider credentials are not part of
//! these settings; they live in the providers file managed by the registry.

mod loader;
mod settings;

pub use loader::{load_settings, LoadOptions, CONFIG_FILENAME};
pub use settings::Settings;

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnv { var: String, value: String },
}
