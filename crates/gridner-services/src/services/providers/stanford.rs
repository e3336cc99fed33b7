//! Stanford CoreNLP server.

use gridner::models::NamedEntity;

use super::json::{array_field, as_object, parse_object, text_field};
use super::{Provider, ProviderConfig, ProviderError, ProviderRequest, ProviderSettings};

const URL_SETTING: &str = "NLP Service URL";

/// A CoreNLP server running the `ner` annotator.
#[derive(Debug, Clone)]
pub struct StanfordNlp {
    config: ProviderConfig,
}

impl Default for StanfordNlp {
    fn default() -> Self {
        Self {
            config: ProviderConfig {
                settings: ProviderSettings::new().declare(URL_SETTING, ""),
                extraction: ProviderSettings::new()
                    .declare("applyNumericClassifiers", "false")
                    .declare("applyFineGrained", "true")
                    .declare("pipelineLanguage", "default"),
            },
        }
    }
}

impl Provider for StanfordNlp {
    fn kind(&self) -> &'static str {
        "stanford-nlp"
    }

    fn documentation_uri(&self) -> Option<&'static str> {
        Some("https://stanfordnlp.github.io/CoreNLP/ner.html")
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ProviderConfig {
        &mut self.config
    }

    fn is_configured(&self) -> bool {
        !self.config.settings.get(URL_SETTING).is_empty()
    }

    fn build_request(
        &self,
        text: &str,
        options: &ProviderSettings,
    ) -> Result<ProviderRequest, ProviderError> {
        let base = self.config.settings.get(URL_SETTING);
        let mut url = url::Url::parse(base)
            .map_err(|e| ProviderError::InvalidRequest(format!("{}: {}", base, e)))?;

        let properties = serde_json::json!({
            "annotators": "ner",
            "ner.applyNumericClassifiers": options.get("applyNumericClassifiers"),
            "ner.applyFineGrained": options.get("applyFineGrained"),
            "pipelineLanguage": options.get("pipelineLanguage"),
        });
        url.query_pairs_mut()
            .append_pair("properties", &properties.to_string());

        Ok(ProviderRequest::text(url, "text/plain; charset=UTF-8", text))
    }

    fn parse_body(&self, _text: &str, body: &str) -> Result<Vec<NamedEntity>, ProviderError> {
        let response = parse_object(body)?;
        if !response.contains_key("sentences") {
            return Ok(Vec::new());
        }

        let mut entities = Vec::new();
        for sentence in array_field(&response, "sentences")? {
            let sentence = as_object(sentence, "sentence")?;
            for mention in array_field(sentence, "entitymentions")? {
                let mention = as_object(mention, "entity mention")?;
                entities.push(NamedEntity::new(text_field(mention, "text")?));
            }
        }
        Ok(entities)
    }
}
