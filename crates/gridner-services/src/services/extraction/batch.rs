//! Concurrent extraction of a column of text.

use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use gridner::models::ExtractionResult;

use crate::services::providers::{Provider, ProviderSettings};
use crate::services::registry::{ProviderRegistry, RegistryError};
use crate::services::transport::Transport;

use super::{extract_text, BatchError, ExtractionEvent};

/// Runs a set of providers over every row of a column.
///
/// Calls are independent and complete in any order; the result matrix is
/// indexed `[row][provider]` in the order the providers were given.
pub struct ExtractionBatch<'a> {
    registry: &'a ProviderRegistry,
    transport: &'a dyn Transport,
    provider_names: Vec<String>,
    overrides: BTreeMap<String, BTreeMap<String, String>>,
    workers: usize,
}

impl<'a> ExtractionBatch<'a> {
    /// Fails if a provider name is not registered.
    pub fn new(
        registry: &'a ProviderRegistry,
        transport: &'a dyn Transport,
        provider_names: Vec<String>,
    ) -> Result<Self, BatchError> {
        for name in &provider_names {
            registry.get(name)?;
        }
        Ok(Self {
            registry,
            transport,
            provider_names,
            overrides: BTreeMap::new(),
            workers: 1,
        })
    }

    /// Maximum number of concurrent provider calls.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Per-run extraction options for one provider. Keys the provider does
    /// not declare are ignored.
    pub fn with_options(mut self, provider: &str, options: BTreeMap<String, String>) -> Self {
        self.overrides
            .entry(provider.to_string())
            .or_default()
            .extend(options);
        self
    }

    pub fn provider_names(&self) -> &[String] {
        &self.provider_names
    }

    /// Extract entities from every text with every provider.
    ///
    /// Once `cancel` turns true no new call is issued; calls in flight finish
    /// and the batch returns `BatchError::Cancelled`.
    pub async fn run(
        &self,
        texts: &[String],
        cancel: &watch::Receiver<bool>,
        events: Option<mpsc::Sender<ExtractionEvent>>,
    ) -> Result<Vec<Vec<ExtractionResult>>, BatchError> {
        let calls = self.resolve_providers()?;
        let provider_count = calls.len();

        emit(
            &events,
            ExtractionEvent::Started {
                rows: texts.len(),
                providers: provider_count,
            },
        )
        .await;

        let jobs = (0..texts.len()).flat_map(|row| (0..provider_count).map(move |col| (row, col)));
        let mut outcomes = stream::iter(jobs)
            .map(|(row, col)| {
                let (provider, options) = &calls[col];
                let text = texts[row].as_str();
                let transport = self.transport;
                async move {
                    if *cancel.borrow() {
                        return (row, col, None);
                    }
                    let result = extract_text(*provider, transport, text, options).await;
                    (row, col, Some(result))
                }
            })
            .buffer_unordered(self.workers);

        let mut results: Vec<Vec<ExtractionResult>> = (0..texts.len())
            .map(|_| vec![ExtractionResult::Entities(Vec::new()); provider_count])
            .collect();
        let mut succeeded = 0;
        let mut failed = 0;
        let mut cancelled = false;

        while let Some((row, col, result)) = outcomes.next().await {
            let Some(result) = result else {
                cancelled = true;
                continue;
            };
            let provider = self.provider_names[col].clone();
            match &result {
                ExtractionResult::Error(error) => {
                    warn!("Row {}: {} failed: {}", row, provider, error);
                    failed += 1;
                    emit(
                        &events,
                        ExtractionEvent::CellFailed {
                            row,
                            provider,
                            error: error.message().to_string(),
                        },
                    )
                    .await;
                }
                ExtractionResult::Entities(entities) => {
                    succeeded += 1;
                    emit(
                        &events,
                        ExtractionEvent::CellCompleted {
                            row,
                            provider,
                            entities: entities.len(),
                        },
                    )
                    .await;
                }
            }
            results[row][col] = result;
        }

        if cancelled {
            info!(
                "Extraction cancelled after {} of {} call(s)",
                succeeded + failed,
                texts.len() * provider_count
            );
            emit(
                &events,
                ExtractionEvent::Cancelled {
                    completed: succeeded + failed,
                },
            )
            .await;
            return Err(BatchError::Cancelled);
        }

        info!(
            "Extraction finished: {} row(s), {} provider(s), {} failed call(s)",
            texts.len(),
            provider_count,
            failed
        );
        emit(&events, ExtractionEvent::Complete { succeeded, failed }).await;
        Ok(results)
    }

    /// Providers with their effective options, in column order.
    fn resolve_providers(&self) -> Result<Vec<(&'a dyn Provider, ProviderSettings)>, RegistryError> {
        let empty = BTreeMap::new();
        self.provider_names
            .iter()
            .map(|name| {
                let provider = self.registry.get(name)?;
                if !provider.is_configured() {
                    warn!("Provider '{}' is not configured", name);
                }
                let overrides = self.overrides.get(name).unwrap_or(&empty);
                Ok((provider, provider.extraction_options(overrides)))
            })
            .collect()
    }
}

async fn emit(events: &Option<mpsc::Sender<ExtractionEvent>>, event: ExtractionEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event).await;
    }
}
