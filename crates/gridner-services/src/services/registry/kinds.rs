//! Type identifier to constructor table.

use std::collections::BTreeMap;

use crate::services::providers::{
    AlchemyApi, DataTxt, DummyNer, NifService, Provider, StanfordNlp, WikiMeta, Zemanta,
};

use super::RegistryError;

/// Builds a fresh provider with default settings.
pub type ProviderConstructor = fn() -> Box<dyn Provider>;

fn construct<P: Provider + Default + 'static>() -> Box<dyn Provider> {
    Box::new(P::default())
}

/// The provider types that can be instantiated by name.
#[derive(Debug, Clone)]
pub struct ProviderKinds {
    constructors: BTreeMap<String, ProviderConstructor>,
}

impl ProviderKinds {
    /// An empty table.
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Every built-in provider type.
    pub fn builtin() -> Self {
        let mut kinds = Self::empty();
        kinds.register("alchemyapi", construct::<AlchemyApi>);
        kinds.register("datatxt", construct::<DataTxt>);
        kinds.register("dummy", construct::<DummyNer>);
        kinds.register("nif", construct::<NifService>);
        kinds.register("stanford-nlp", construct::<StanfordNlp>);
        kinds.register("wikimeta", construct::<WikiMeta>);
        kinds.register("zemanta", construct::<Zemanta>);
        kinds
    }

    /// Register (or replace) a provider type.
    pub fn register(&mut self, type_id: &str, constructor: ProviderConstructor) {
        self.constructors.insert(type_id.to_string(), constructor);
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.constructors.contains_key(type_id)
    }

    pub fn type_ids(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    pub fn create(&self, type_id: &str) -> Result<Box<dyn Provider>, RegistryError> {
        self.constructors
            .get(type_id)
            .map(|constructor| constructor())
            .ok_or_else(|| RegistryError::UnknownProviderType(type_id.to_string()))
    }
}

impl Default for ProviderKinds {
    fn default() -> Self {
        Self::builtin()
    }
}
