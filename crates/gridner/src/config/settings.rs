//! Application settings.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default providers filename inside the data directory.
const PROVIDERS_FILENAME: &str = "providers.json";

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Provider configuration file (defaults to `data_dir/providers.json`).
    pub providers_file: Option<PathBuf>,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// Concurrent provider calls during an extraction batch.
    pub workers: usize,
    /// User agent for HTTP requests.
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridner");

        Self {
            data_dir,
            providers_file: None,
            request_timeout: 30,
            workers: 4,
            user_agent: format!("gridner/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Default::default()
        }
    }

    /// Path of the provider configuration file.
    pub fn providers_path(&self) -> PathBuf {
        self.providers_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(PROVIDERS_FILENAME))
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create data directory '{}': {}",
                    self.data_dir.display(),
                    e
                ),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_providers_path_defaults_to_data_dir() {
        let settings = Settings::with_data_dir(PathBuf::from("/tmp/gridner-test"));
        assert_eq!(
            settings.providers_path(),
            PathBuf::from("/tmp/gridner-test/providers.json")
        );

        let settings = Settings {
            providers_file: Some(PathBuf::from("/etc/providers.json")),
            ..settings
        };
        assert_eq!(settings.providers_path(), PathBuf::from("/etc/providers.json"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str("workers = 8\n").unwrap();
        assert_eq!(settings.workers, 8);
        assert_eq!(settings.request_timeout, 30);
        assert!(settings.providers_file.is_none());
    }
}
