//! AlchemyAPI ranked named entities.

use gridner::models::{Disambiguation, NamedEntity};

use super::json::{array_field, as_object, field, parse_object, text_field, text_of};
use super::{service_url, Provider, ProviderConfig, ProviderError, ProviderRequest, ProviderSettings};

const SERVICE_URL: &str =
    "http://access.alchemyapi.com/calls/text/TextGetRankedNamedEntities?outputMode=json";

/// Fields of `disambiguated` that are not identifiers.
const NON_URI_FIELDS: [&str; 3] = ["subType", "name", "website"];

#[derive(Debug, Clone)]
pub struct AlchemyApi {
    config: ProviderConfig,
}

impl Default for AlchemyApi {
    fn default() -> Self {
        Self {
            config: ProviderConfig {
                settings: ProviderSettings::new().declare("API key", ""),
                extraction: ProviderSettings::new(),
            },
        }
    }
}

impl Provider for AlchemyApi {
    fn kind(&self) -> &'static str {
        "alchemyapi"
    }

    fn documentation_uri(&self) -> Option<&'static str> {
        Some("http://freeyourmetadata.org/named-entity-extraction/alchemyapi/")
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
                ("apikey", self.config.settings.get("API key").to_string()),
                ("text", text.to_string()),
            ],
        ))
    }

    fn parse_body(&self, _text: &str, body: &str) -> Result<Vec<NamedEntity>, ProviderError> {
        let response = parse_object(body)?;
        if text_field(&response, "status")? != "OK" {
            let message = response
                .get("statusInfo")
                .and_then(|v| v.as_str())
                .unwrap_or("Extraction failed");
            return Err(ProviderError::Reported(message.to_string()));
        }

        let mut entities = Vec::new();
        for entity in array_field(&response, "entities")? {
            let entity = as_object(entity, "entity")?;
            let text = text_field(entity, "text")?;

            let mut disambiguations = Vec::new();
            if let Some(disambiguated) = entity.get("disambiguated") {
                let disambiguated = as_object(disambiguated, "disambiguated")?;
                let label = text_of(field(disambiguated, "name")?);
                // Every remaining field is a link to a knowledge base, in payload order
                for (key, value) in disambiguated {
                    if !NON_URI_FIELDS.contains(&key.as_str()) {
                        disambiguations.push(Disambiguation::linked(label.clone(), text_of(value)));
                    }
                }
            }
            entities.push(NamedEntity::with_disambiguations(text, disambiguations));
        }
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_disambiguated_entities() {
        let body = r#"{
            "status": "OK",
            "entities": [
                {
                    "type": "Company",
                    "text": "Konarka",
                    "disambiguated": {
                        "subType": ["Company"],
                        "name": "Konarka Technologies",
                        "website": "http://www.konarka.com/",
                        "dbpedia": "http://dbpedia.org/resource/Konarka_Technologies",
                        "freebase": "http://rdf.freebase.com/ns/m.0bx6s6"
                    }
                },
                { "type": "City", "text": "Lowell" }
            ]
        }"#;

        let entities = AlchemyApi::default().parse_body("", body).unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(
            entities[0],
            NamedEntity::with_disambiguations(
                "Konarka",
                vec![
                    Disambiguation::linked(
                        "Konarka Technologies",
                        "http://dbpedia.org/resource/Konarka_Technologies"
                    ),
                    Disambiguation::linked(
                        "Konarka Technologies",
                        "http://rdf.freebase.com/ns/m.0bx6s6"
                    ),
                ]
            )
        );
        assert_eq!(entities[1], NamedEntity::new("Lowell"));
    }

    #[test]
    fn test_status_error() {
        let provider = AlchemyApi::default();
        assert_eq!(
            provider.parse_body("", r#"{"status": "ERROR", "statusInfo": "invalid-api-key"}"#),
            Err(ProviderError::Reported("invalid-api-key".to_string()))
        );
        assert_eq!(
            provider.parse_body("", r#"{"status": "ERROR"}"#),
            Err(ProviderError::Reported("Extraction failed".to_string()))
        );
    }

    #[test]
    fn test_request_is_form_with_key() {
        let mut provider = AlchemyApi::default();
        provider.config_mut().settings.set("API key", "k3y");
        let request = provider.build_request("Lowell", &ProviderSettings::new()).unwrap();
        assert_eq!(request.form_value("apikey"), Some("k3y"));
        assert_eq!(request.form_value("text"), Some("Lowell"));
        assert_eq!(request.url.query(), Some("outputMode=json"));
    }
}
