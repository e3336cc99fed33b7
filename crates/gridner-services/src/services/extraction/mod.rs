//! Running providers over text.

mod batch;
mod types;

pub use batch::ExtractionBatch;
pub use types::{BatchError, ExtractionEvent};

use tracing::debug;

use gridner::models::ExtractionResult;

use super::providers::{Provider, ProviderError, ProviderSettings};
use super::transport::Transport;

/// Run one provider on one text. Every failure is captured in the result.
///
/// Blank text is not sent; it has no entities.
pub async fn extract_text(
    provider: &dyn Provider,
    transport: &dyn Transport,
    text: &str,
    options: &ProviderSettings,
) -> ExtractionResult {
    if text.trim().is_empty() {
        return ExtractionResult::Entities(Vec::new());
    }
    match call_provider(provider, transport, text, options).await {
        Ok(entities) => ExtractionResult::Entities(entities),
        Err(e) => {
            debug!("{} extraction failed: {}", provider.kind(), e);
            ExtractionResult::Error(e.into())
        }
    }
}

async fn call_provider(
    provider: &dyn Provider,
    transport: &dyn Transport,
    text: &str,
    options: &ProviderSettings,
) -> Result<Vec<gridner::models::NamedEntity>, ProviderError> {
    if !provider.is_configured() {
        return Err(ProviderError::NotConfigured(provider.kind().to_string()));
    }
    let request = provider.build_request(text, options)?;
    let response = transport.invoke(request).await?;
    provider.parse_response(text, &response)
}
