//! Test service returning plain entities.

use gridner::models::NamedEntity;

use super::json::{array_field, parse_object, text_of};
use super::{service_url, Provider, ProviderConfig, ProviderError, ProviderRequest, ProviderSettings};

const SERVICE_URL: &str = "http://dummyner.freeyourmetadata.org/";

#[derive(Debug, Clone)]
pub struct DummyNer {
    config: ProviderConfig,
}

impl Default for DummyNer {
    fn default() -> Self {
        Self {
            config: ProviderConfig {
                settings: ProviderSettings::new()
                    .declare("API user", "ABCDEFGHIJKL")
                    .declare("API key", "KLMNOPQRSTUV"),
                extraction: ProviderSettings::new().declare("Confidence", "0.5"),
            },
        }
    }
}

impl Provider for DummyNer {
    fn kind(&self) -> &'static str {
        "dummy"
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ProviderConfig {
        &mut self.config
    }

    fn is_configured(&self) -> bool {
        let settings = &self.config.settings;
        !settings.get("API user").is_empty() && !settings.get("API key").is_empty()
    }

    fn build_request(
        &self,
        text: &str,
        _options: &ProviderSettings,
    ) -> Result<ProviderRequest, ProviderError> {
        Ok(ProviderRequest::text(
            service_url(SERVICE_URL)?,
            "text/plain; charset=UTF-8",
            text,
        ))
    }

    fn parse_body(&self, _text: &str, body: &str) -> Result<Vec<NamedEntity>, ProviderError> {
        let response = parse_object(body)?;
        Ok(array_field(&response, "entities")?
            .iter()
            .map(|entity| NamedEntity::new(text_of(entity)))
            .collect())
    }

    fn error_message(&self, body: &str) -> Option<String> {
        let response = parse_object(body).ok()?;
        response.get("message").map(text_of)
    }
}
