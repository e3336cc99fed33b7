//! Provider registry: named provider instances and their persisted settings.

mod descriptor;
mod kinds;
mod manager;

pub use descriptor::ProviderDescriptor;
pub use kinds::{ProviderConstructor, ProviderKinds};
pub use manager::ProviderRegistry;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("No provider named '{0}' exists")]
    UnknownProvider(String),

    #[error("Unknown provider type '{0}'")]
    UnknownProviderType(String),

    #[error("Failed to access providers file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid provider configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Registry has no providers file")]
    NoSettingsFile,
}
