//! Batch events and errors.

use thiserror::Error;

use crate::services::registry::RegistryError;

/// Progress of an extraction batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionEvent {
    Started {
        rows: usize,
        providers: usize,
    },
    CellCompleted {
        row: usize,
        provider: String,
        entities: usize,
    },
    CellFailed {
        row: usize,
        provider: String,
        error: String,
    },
    Cancelled {
        completed: usize,
    },
    Complete {
        succeeded: usize,
        failed: usize,
    },
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Extraction cancelled")]
    Cancelled,
}
