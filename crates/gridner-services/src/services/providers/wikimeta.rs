//! WikiMeta semantic labelling.

use gridner::models::NamedEntity;

use super::json::{array_field, as_object, parse_object, parse_score, text_field};
use super::{service_url, Provider, ProviderConfig, ProviderError, ProviderRequest, ProviderSettings};

const SERVICE_URL: &str = "http://www.wikimeta.com/wapi/service";

/// Identifier WikiMeta uses for entities without a linked resource.
const NO_RDF: &str = "NORDF";

#[derive(Debug, Clone)]
pub struct WikiMeta {
    config: ProviderConfig,
}

impl Default for WikiMeta {
    fn default() -> Self {
        Self {
            config: ProviderConfig {
                settings: ProviderSettings::new().declare("API key", ""),
                extraction: ProviderSettings::new()
                    .declare("Language", "en")
                    .declare("Span", "100")
                    .declare("Treshold", "10"),
            },
        }
    }
}

impl Provider for WikiMeta {
    fn kind(&self) -> &'static str {
        "wikimeta"
    }

    fn documentation_uri(&self) -> Option<&'static str> {
        Some("http://www.wikimeta.com/api.html")
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ProviderConfig {
        &mut self.config
    }

    fn is_configured(&self) -> bool {
        !self.config.settings.get("API key").is_empty()
    }

    fn build_request(
        &self,
        text: &str,
        options: &ProviderSettings,
    ) -> Result<ProviderRequest, ProviderError> {
        Ok(ProviderRequest::form(
            service_url(SERVICE_URL)?,
            vec![
                ("api", self.config.settings.get("API key").to_string()),
                ("contenu", text.to_string()),
                ("treshold", options.get("Treshold").to_string()),
                ("span", options.get("Span").to_string()),
                ("lng", options.get("Language").to_uppercase()),
                ("semtag", "1".to_string()),
            ],
        ))
    }

    fn parse_body(&self, _text: &str, body: &str) -> Result<Vec<NamedEntity>, ProviderError> {
        let response = parse_object(body)?;
        let document = array_field(&response, "document")?;
        let section = document
            .get(2)
            .ok_or_else(|| ProviderError::MalformedResponse("document has no entity section".to_string()))?;
        let section = as_object(section, "document[2]")?;

        let mut entities = Vec::new();
        for entity in array_field(section, "Named Entities")? {
            let entity = as_object(entity, "named entity")?;
            let text = text_field(entity, "EN")?;

            let score_text = text_field(entity, "confidenceScore")?;
            let score = if score_text.is_empty() {
                1.0
            } else {
                parse_score(&score_text)?
            };

            // Prefer the linked data identifier, then the plain one
            let linked = text_field(entity, "LINKEDDATA")?;
            let uri = if linked != "null" {
                linked
            } else {
                text_field(entity, "URI")?
            };
            let uri = if uri == NO_RDF { String::new() } else { uri };

            entities.push(NamedEntity::with_scored_uri(text, uri, score));
        }
        Ok(entities)
    }
}
