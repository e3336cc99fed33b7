//! Registry of named providers backed by a JSON settings file.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::services::providers::Provider;

use super::{ProviderDescriptor, ProviderKinds, RegistryError};

/// Providers created for a fresh installation.
const DEFAULT_PROVIDERS: &str = include_str!("default_providers.json");

/// Named provider instances, ordered by name.
#[derive(Debug)]
pub struct ProviderRegistry {
    kinds: ProviderKinds,
    providers: BTreeMap<String, Box<dyn Provider>>,
    settings_file: Option<PathBuf>,
}

impl ProviderRegistry {
    /// A registry seeded with the default providers.
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_kinds(ProviderKinds::builtin())
    }

    /// A registry using a custom kind table, seeded with the default providers.
    /// Default entries whose type is missing from `kinds` are skipped.
    pub fn with_kinds(kinds: ProviderKinds) -> Result<Self, RegistryError> {
        let mut registry = Self::empty(kinds);
        registry.update_from_json(DEFAULT_PROVIDERS)?;
        Ok(registry)
    }

    /// A registry without any provider.
    pub fn empty(kinds: ProviderKinds) -> Self {
        Self {
            kinds,
            providers: BTreeMap::new(),
            settings_file: None,
        }
    }

    /// Seed the defaults, then apply the user's settings file if it exists.
    /// `save` writes back to the same file.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let mut registry = Self::new()?;
        registry.settings_file = Some(path.to_path_buf());

        if path.exists() {
            let content = fs::read_to_string(path).map_err(|source| RegistryError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            registry.update_from_json(&content)?;
            debug!("Loaded provider settings from {}", path.display());
        }
        Ok(registry)
    }

    pub fn kinds(&self) -> &ProviderKinds {
        &self.kinds
    }

    pub fn settings_file(&self) -> Option<&Path> {
        self.settings_file.as_deref()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn get(&self, name: &str) -> Result<&dyn Provider, RegistryError> {
        self.providers
            .get(name)
            .map(|provider| provider.as_ref())
            .ok_or_else(|| RegistryError::UnknownProvider(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut (dyn Provider + 'static), RegistryError> {
        self.providers
            .get_mut(name)
            .map(|provider| provider.as_mut())
            .ok_or_else(|| RegistryError::UnknownProvider(name.to_string()))
    }

    /// The provider called `name`, creating one of type `type_id` if absent.
    /// An existing provider is returned as is, whatever its type.
    pub fn get_or_create(
        &mut self,
        name: &str,
        type_id: &str,
    ) -> Result<&mut (dyn Provider + 'static), RegistryError> {
        match self.providers.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut().as_mut()),
            Entry::Vacant(entry) => {
                let provider = self.kinds.create(type_id)?;
                info!("Created provider '{}' of type {}", name, type_id);
                Ok(entry.insert(provider).as_mut())
            }
        }
    }

    /// Register a provider instance, replacing any provider with that name.
    pub fn insert(&mut self, name: &str, provider: Box<dyn Provider>) {
        self.providers.insert(name.to_string(), provider);
    }

    /// Merge service settings. Keys the provider does not declare are ignored.
    pub fn update_settings(
        &mut self,
        name: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<usize, RegistryError> {
        Ok(self.get_mut(name)?.config_mut().settings.merge(values))
    }

    /// Merge extraction defaults, with the same policy as `update_settings`.
    pub fn update_extraction_defaults(
        &mut self,
        name: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<usize, RegistryError> {
        Ok(self.get_mut(name)?.config_mut().extraction.merge(values))
    }

    pub fn serialize(&self) -> Vec<ProviderDescriptor> {
        self.providers
            .iter()
            .map(|(name, provider)| ProviderDescriptor::describe(name, provider.as_ref()))
            .collect()
    }

    /// Create or update providers from descriptors.
    ///
    /// Entries with an unknown type are logged and skipped so that a settings
    /// file written by another version still loads.
    pub fn update_from(&mut self, descriptors: &[ProviderDescriptor]) {
        for descriptor in descriptors {
            let provider = match self.get_or_create(&descriptor.name, &descriptor.kind) {
                Ok(provider) => provider,
                Err(e) => {
                    warn!("Skipping provider '{}': {}", descriptor.name, e);
                    continue;
                }
            };
            let config = provider.config_mut();
            config.settings.merge(&descriptor.settings);
            config.extraction.merge(&descriptor.extraction_settings);
        }
    }

    pub fn update_from_json(&mut self, json: &str) -> Result<(), RegistryError> {
        let descriptors: Vec<ProviderDescriptor> = serde_json::from_str(json)?;
        self.update_from(&descriptors);
        Ok(())
    }

    /// Write the registry to its settings file.
    pub fn save(&self) -> Result<(), RegistryError> {
        let path = self
            .settings_file
            .as_deref()
            .ok_or(RegistryError::NoSettingsFile)?;
        self.save_to(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), RegistryError> {
        let io_error = |source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = serde_json::to_string_pretty(&self.serialize())?;
        fs::write(path, content).map_err(io_error)?;
        debug!("Saved {} provider(s) to {}", self.len(), path.display());
        Ok(())
    }
}
