//! HTTP transport for provider requests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use gridner::config::Settings;

use super::providers::{ProviderError, ProviderRequest, ProviderResponse, RequestBody};

/// Performs provider requests.
///
/// Non-success statuses are returned as responses so adapters can read the
/// provider's error payload; only failures to get a response are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn invoke(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError>;
}

/// `Transport` over a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ProviderError> {
        Self::new(
            &settings.user_agent,
            Duration::from_secs(settings.request_timeout),
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn invoke(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        debug!("POST {}", request.url);
        let mut builder = self.client.post(request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            RequestBody::Form(params) => builder.form(&params),
            RequestBody::Text {
                content_type,
                content,
            } => builder.header(CONTENT_TYPE, content_type).body(content),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Transport(format!("Request timed out: {}", e))
            } else {
                ProviderError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(format!("Failed to read response: {}", e)))?;

        Ok(ProviderResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}
