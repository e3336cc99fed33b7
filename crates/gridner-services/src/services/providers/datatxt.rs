//! Dandelion dataTXT entity extraction.

use gridner::models::{Disambiguation, NamedEntity};

use super::json::{array_field, as_object, number_field, parse_object, text_field, text_of};
use super::{service_url, Provider, ProviderConfig, ProviderError, ProviderRequest, ProviderSettings};

const SERVICE_URL: &str = "https://api.dandelion.eu/datatxt/nex/v1";

#[derive(Debug, Clone)]
pub struct DataTxt {
    config: ProviderConfig,
}

impl Default for DataTxt {
    fn default() -> Self {
        Self {
            config: ProviderConfig {
                settings: ProviderSettings::new().declare("Token", ""),
                extraction: ProviderSettings::new()
                    .declare("Language", "auto")
                    .declare("Confidence", "0.6")
                    .declare("Min length", "2"),
            },
        }
    }
}

impl Provider for DataTxt {
    fn kind(&self) -> &'static str {
        "datatxt"
    }

    fn documentation_uri(&self) -> Option<&'static str> {
        Some("https://dandelion.eu/docs/api/datatxt/nex/v1/")
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ProviderConfig {
        &mut self.config
    }

    fn is_configured(&self) -> bool {
        !self.config.settings.get("Token").is_empty()
    }

    fn build_request(
        &self,
        text: &str,
        options: &ProviderSettings,
    ) -> Result<ProviderRequest, ProviderError> {
        Ok(ProviderRequest::form(
            service_url(SERVICE_URL)?,
            vec![
                ("lang", options.get("Language").to_string()),
                ("text", text.to_string()),
                ("min_confidence", options.get("Confidence").to_string()),
                ("min_length", options.get("Min length").to_string()),
                ("token", self.config.settings.get("Token").to_string()),
            ],
        ))
    }

    fn parse_body(&self, _text: &str, body: &str) -> Result<Vec<NamedEntity>, ProviderError> {
        let response = parse_object(body)?;
        let mut entities = Vec::new();
        for annotation in array_field(&response, "annotations")? {
            let annotation = as_object(annotation, "annotation")?;
            let disambiguation = Disambiguation::new(
                text_field(annotation, "title")?,
                text_field(annotation, "uri")?,
                number_field(annotation, "confidence")?,
            );
            entities.push(NamedEntity::with_disambiguations(
                text_field(annotation, "spot")?,
                vec![disambiguation],
            ));
        }
        Ok(entities)
    }

    fn error_message(&self, body: &str) -> Option<String> {
        let response = parse_object(body).ok()?;
        response.get("message").map(text_of)
    }
}
