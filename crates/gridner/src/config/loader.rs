//! Settings loading: config file first, then environment overrides.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ConfigError, Settings};

/// Config filename looked up inside the default data directory.
pub const CONFIG_FILENAME: &str = "gridner.toml";

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
}

/// Load settings from the config file and the process environment.
///
/// An explicit config path must exist; the default `gridner.toml` in the data
/// directory is used only when present.
pub fn load_settings(options: &LoadOptions) -> Result<Settings, ConfigError> {
    let mut settings = match &options.config_path {
        Some(path) => read_config_file(path)?,
        None => {
            let candidate = Settings::default().data_dir.join(CONFIG_FILENAME);
            if candidate.exists() {
                read_config_file(&candidate)?
            } else {
                Settings::default()
            }
        }
    };

    apply_env_overrides(&mut settings, |var| std::env::var(var).ok())?;
    Ok(settings)
}

fn read_config_file(path: &Path) -> Result<Settings, ConfigError> {
    debug!("Loading config from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply `GRIDNER_*` overrides; empty values are ignored.
fn apply_env_overrides<F>(settings: &mut Settings, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(dir) = var("GRIDNER_DATA_DIR") {
        settings.data_dir = PathBuf::from(dir);
    }
    if let Some(file) = var("GRIDNER_PROVIDERS_FILE") {
        settings.providers_file = Some(PathBuf::from(file));
    }
    if let Some(value) = var("GRIDNER_TIMEOUT") {
        settings.request_timeout = parse_env("GRIDNER_TIMEOUT", &value)?;
    }
    if let Some(value) = var("GRIDNER_WORKERS") {
        let workers: usize = parse_env("GRIDNER_WORKERS", &value)?;
        if workers == 0 {
            return Err(ConfigError::InvalidEnv {
                var: "GRIDNER_WORKERS".to_string(),
                value,
            });
        }
        settings.workers = workers;
    }
    Ok(())
}

fn parse_env<T: std::str::FromStr>(var: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var: var.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::with_data_dir(PathBuf::from("/data"));
        apply_env_overrides(
            &mut settings,
            env(&[
                ("GRIDNER_TIMEOUT", "5"),
                ("GRIDNER_WORKERS", "2"),
                ("GRIDNER_PROVIDERS_FILE", "/etc/p.json"),
                ("GRIDNER_DATA_DIR", ""),
            ]),
        )
        .unwrap();

        assert_eq!(settings.request_timeout, 5);
        assert_eq!(settings.workers, 2);
        assert_eq!(settings.data_dir, PathBuf::from("/data"));
        assert_eq!(settings.providers_path(), PathBuf::from("/etc/p.json"));
    }

    #[test]
    fn test_invalid_env_value() {
        let mut settings = Settings::default();
        let err = apply_env_overrides(&mut settings, env(&[("GRIDNER_WORKERS", "0")]));
        assert!(matches!(err, Err(ConfigError::InvalidEnv { .. })));

        let err = apply_env_overrides(&mut settings, env(&[("GRIDNER_TIMEOUT", "soon")]));
        assert!(matches!(err, Err(ConfigError::InvalidEnv { .. })));
    }

    #[test]
    fn test_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gridner.toml");
        std::fs::write(&path, "request_timeout = 12\nuser_agent = \"test\"\n").unwrap();

        let settings = read_config_file(&path).unwrap();
        assert_eq!(settings.request_timeout, 12);
        assert_eq!(settings.user_agent, "test");

        let missing = dir.path().join("missing.toml");
        let options = LoadOptions {
            config_path: Some(missing),
        };
        assert!(matches!(load_settings(&options), Err(ConfigError::Io { .. })));
    }
}
