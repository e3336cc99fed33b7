//! Serialized form of a registered provider.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::services::providers::Provider;

/// One entry of the providers file.
///
/// `configured` is derived from the provider's settings when written and
/// ignored when read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDescriptor {
    pub name: String,
    #[serde(rename = "class")]
    pub kind: String,
    #[serde(default)]
    pub configured: bool,
    #[serde(default)]
    pub documentation: String,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    #[serde(default)]
    pub extraction_settings: BTreeMap<String, String>,
}

impl ProviderDescriptor {
    pub fn describe(name: &str, provider: &dyn Provider) -> Self {
        let config = provider.config();
        Self {
            name: name.to_string(),
            kind: provider.kind().to_string(),
            configured: provider.is_configured(),
            documentation: provider.documentation_uri().unwrap_or_default().to_string(),
            settings: to_map(config.settings.iter()),
            extraction_settings: to_map(config.extraction.iter()),
        }
    }
}

fn to_map<'a>(values: impl Iterator<Item = (&'a str, &'a str)>) -> BTreeMap<String, String> {
    values
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
