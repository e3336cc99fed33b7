//! Declared, string-valued provider settings.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

/// A fixed set of named string settings.
///
/// The keys are declared when the provider is constructed and never change
/// afterwards: `set` and `merge` only touch declared keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProviderSettings {
    values: BTreeMap<String, String>,
}

impl ProviderSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a key with its default value.
    pub fn declare(mut self, key: &str, default: &str) -> Self {
        self.values.insert(key.to_string(), default.to_string());
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Value of a key; undeclared keys read as empty.
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or_default()
    }

    /// Set a declared key. Returns `false` and changes nothing for unknown keys.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.values.get_mut(key) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Merge values for declared keys, ignoring the rest. Returns how many
    /// values were applied.
    pub fn merge<'a, I>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut applied = 0;
        for (key, value) in values {
            if self.set(key, value.clone()) {
                applied += 1;
            } else {
                debug!("Ignoring unknown setting '{}'", key);
            }
        }
        applied
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_ignores_unknown_keys() {
        let mut settings = ProviderSettings::new()
            .declare("API key", "")
            .declare("API user", "me");

        let input = BTreeMap::from([
            ("API key".to_string(), "secret".to_string()),
            ("Endpoint".to_string(), "http://example.org".to_string()),
        ]);
        assert_eq!(settings.merge(&input), 1);

        assert_eq!(settings.get("API key"), "secret");
        assert_eq!(settings.get("API user"), "me");
        assert!(!settings.contains("Endpoint"));
        assert_eq!(settings.get("Endpoint"), "");
    }

    #[test]
    fn test_set_unknown_key_is_rejected() {
        let mut settings = ProviderSettings::new().declare("Token", "");
        assert!(!settings.set("token", "x"));
        assert!(settings.set("Token", "x"));
        assert_eq!(settings.keys().collect::<Vec<_>>(), vec!["Token"]);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let settings = ProviderSettings::new().declare("Language", "en").declare("Span", "100");
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            serde_json::json!({ "Language": "en", "Span": "100" })
        );
    }
}
