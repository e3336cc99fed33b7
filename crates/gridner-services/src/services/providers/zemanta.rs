//! Zemanta markup suggestions.

use gridner::models::{Disambiguation, NamedEntity};

use super::json::{array_field, as_object, object_field, parse_object, text_field};
use super::{service_url, Provider, ProviderConfig, ProviderError, ProviderRequest, ProviderSettings};

const SERVICE_URL: &str = "http://papi.zemanta.com/services/rest/0.0/";

#[derive(Debug, Clone)]
pub struct Zemanta {
    config: ProviderConfig,
}

impl Default for Zemanta {
    fn default() -> Self {
        Self {
            config: ProviderConfig {
                settings: ProviderSettings::new().declare("API key", ""),
                extraction: ProviderSettings::new(),
            },
        }
    }
}

impl Provider for Zemanta {
    fn kind(&self) -> &'static str {
        "zemanta"
    }

    fn documentation_uri(&self) -> Option<&'static str> {
        Some("http://freeyourmetadata.org/named-entity-extraction/zemanta/")
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
        _options: &ProviderSettings,
    ) -> Result<ProviderRequest, ProviderError> {
        Ok(ProviderRequest::form(
            service_url(SERVICE_URL)?,
            vec![
                ("method", "zemanta.suggest_markup".to_string()),
                ("format", "json".to_string()),
                ("return_rdf_links", "1".to_string()),
                ("api_key", self.config.settings.get("API key").to_string()),
                ("text", text.to_string()),
            ],
        ))
    }

    fn parse_body(&self, _text: &str, body: &str) -> Result<Vec<NamedEntity>, ProviderError> {
        let response = parse_object(body)?;
        let status = text_field(&response, "status")?;
        if status != "ok" {
            return Err(ProviderError::Reported(status));
        }

        let markup = object_field(&response, "markup")?;
        let mut entities = Vec::new();
        for link in array_field(markup, "links")? {
            let link = as_object(link, "link")?;
            let targets = array_field(link, "target")?;

            let mut disambiguations = Vec::with_capacity(targets.len());
            for target in targets {
                let target = as_object(target, "target")?;
                disambiguations.push(Disambiguation::linked(
                    text_field(target, "title")?,
                    text_field(target, "url")?,
                ));
            }
            let Some(first) = disambiguations.first() else {
                return Err(ProviderError::MalformedResponse("link without targets".to_string()));
            };
            let text = first.label().to_string();
            entities.push(NamedEntity::with_disambiguations(text, disambiguations));
        }
        Ok(entities)
    }

    /// Zemanta error bodies are plain text.
    fn error_message(&self, body: &str) -> Option<String> {
        Some(body.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::ProviderResponse;

    #[test]
    fn test_parse_links() {
        let body = r#"{"status": "ok", "markup": {"links": [
            {"target": [
                {"title": "Lowell, Massachusetts", "url": "http://en.wikipedia.org/wiki/Lowell,_Massachusetts"},
                {"title": "Lowell, Massachusetts", "url": "http://dbpedia.org/resource/Lowell,_Massachusetts"}
            ]}
        ]}}"#;
        let entities = Zemanta::default().parse_body("", body).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].extracted_text(), "Lowell, Massachusetts");
        assert_eq!(entities[0].disambiguations().len(), 2);
        assert_eq!(
            entities[0].disambiguations()[1].uri(),
            "http://dbpedia.org/resource/Lowell,_Massachusetts"
        );
    }

    #[test]
    fn test_failures() {
        let provider = Zemanta::default();
        assert_eq!(
            provider.parse_body("", r#"{"status": "fail"}"#),
            Err(ProviderError::Reported("fail".to_string()))
        );

        let response = ProviderResponse {
            status: 403,
            reason: "Forbidden".to_string(),
            body: "Developer Inactive\n".to_string(),
        };
        assert_eq!(
            provider.parse_response("", &response),
            Err(ProviderError::Reported("Developer Inactive".to_string()))
        );
    }

    #[test]
    fn test_request_parameters() {
        let request = Zemanta::default()
            .build_request("Lowell", &ProviderSettings::new())
            .unwrap();
        assert_eq!(request.form_value("method"), Some("zemanta.suggest_markup"));
        assert_eq!(request.form_value("return_rdf_links"), Some("1"));
    }
}
