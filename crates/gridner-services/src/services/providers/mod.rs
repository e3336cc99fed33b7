//! Provider adapters.
//!
//! Each provider knows how to turn a piece of text into an HTTP request and
//! how to normalize the service's payload into named entities. Transport is
//! handled elsewhere; adapters never perform I/O.

mod alchemy;
mod datatxt;
mod dummy;
mod json;
mod nif;
mod settings;
mod stanford;
mod wikimeta;
mod zemanta;

pub use alchemy::AlchemyApi;
pub use datatxt::DataTxt;
pub use dummy::DummyNer;
pub use nif::NifService;
pub use settings::ProviderSettings;
pub use stanford::StanfordNlp;
pub use wikimeta::WikiMeta;
pub use zemanta::Zemanta;

use std::collections::BTreeMap;

use thiserror::Error;
use url::Url;

use gridner::models::{ExtractionError, NamedEntity};

/// Failures of a single extraction call. All of them are recorded per cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Network failure or timeout talking to the provider.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The provider's payload itself signals a failure.
    #[error("{0}")]
    Reported(String),

    /// The payload does not have the shape the adapter expects.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Provider {0} is not configured")]
    NotConfigured(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<ProviderError> for ExtractionError {
    fn from(error: ProviderError) -> Self {
        ExtractionError::new(error.to_string())
    }
}

/// Declared settings of a provider instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderConfig {
    /// Service settings such as credentials or endpoints.
    pub settings: ProviderSettings,
    /// Defaults for per-extraction options.
    pub extraction: ProviderSettings,
}

/// Body of a provider request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` parameters, in order.
    Form(Vec<(String, String)>),
    /// A raw body with an explicit content type.
    Text {
        content_type: String,
        content: String,
    },
}

/// A POST request to a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ProviderRequest {
    pub fn form(url: Url, params: Vec<(&str, String)>) -> Self {
        Self {
            url,
            headers: vec![("Accept".to_string(), "application/json".to_string())],
            body: RequestBody::Form(
                params
                    .into_iter()
                    .map(|(key, value)| (key.to_string(), value))
                    .collect(),
            ),
        }
    }

    pub fn text(url: Url, content_type: &str, content: impl Into<String>) -> Self {
        Self {
            url,
            headers: vec![("Accept".to_string(), "application/json".to_string())],
            body: RequestBody::Text {
                content_type: content_type.to_string(),
                content: content.into(),
            },
        }
    }

    /// Replace a header, adding it if absent.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Value of a form parameter, if the body is a form.
    pub fn form_value(&self, key: &str) -> Option<&str> {
        match &self.body {
            RequestBody::Form(params) => params
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.as_str()),
            RequestBody::Text { .. } => None,
        }
    }
}

/// Raw response as returned by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub status: u16,
    /// HTTP reason phrase, possibly empty.
    pub reason: String,
    pub body: String,
}

impl ProviderResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            reason: "OK".to_string(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status < 300
    }
}

/// A named-entity recognition provider.
///
/// Implementations are plain values holding their configuration; the
/// registry owns them as `Box<dyn Provider>`.
pub trait Provider: Send + Sync + std::fmt::Debug {
    /// Type identifier used in the providers file (`class`).
    fn kind(&self) -> &'static str;

    fn documentation_uri(&self) -> Option<&'static str> {
        None
    }

    fn config(&self) -> &ProviderConfig;

    fn config_mut(&mut self) -> &mut ProviderConfig;

    /// Whether the provider has what it needs to be called.
    fn is_configured(&self) -> bool;

    /// Build the request for `text`, using the effective extraction options.
    fn build_request(
        &self,
        text: &str,
        options: &ProviderSettings,
    ) -> Result<ProviderRequest, ProviderError>;

    /// Normalize a successful payload.
    fn parse_body(&self, text: &str, body: &str) -> Result<Vec<NamedEntity>, ProviderError>;

    /// Error message carried by a failed response body, if the provider has one.
    fn error_message(&self, _body: &str) -> Option<String> {
        None
    }

    /// Normalize a response: status >= 300 is a reported error, anything else
    /// goes to `parse_body`.
    fn parse_response(
        &self,
        text: &str,
        response: &ProviderResponse,
    ) -> Result<Vec<NamedEntity>, ProviderError> {
        if !response.is_success() {
            let message = self
                .error_message(&response.body)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| {
                    if response.reason.is_empty() {
                        format!("HTTP {}", response.status)
                    } else {
                        response.reason.clone()
                    }
                });
            return Err(ProviderError::Reported(message));
        }
        self.parse_body(text, &response.body)
    }

    /// Extraction defaults with per-run overrides merged in. Unknown keys
    /// are ignored.
    fn extraction_options(&self, overrides: &BTreeMap<String, String>) -> ProviderSettings {
        let mut options = self.config().extraction.clone();
        options.merge(overrides);
        options
    }
}

/// Parse one of the fixed service URLs.
fn service_url(url: &str) -> Result<Url, ProviderError> {
    Url::parse(url).map_err(|e| ProviderError::InvalidRequest(format!("{}: {}", url, e)))
}
