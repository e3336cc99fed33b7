//! Outcome of running one provider on one row.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::NamedEntity;

/// A captured provider failure, stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionError {
    #[serde(rename = "error")]
    message: String,
}

impl ExtractionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Returned when asking an `ExtractionResult` for the variant it does not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WrongVariant {
    #[error("Extraction failed, no entities available: {0}")]
    NotEntities(String),
    #[error("Extraction succeeded, no error available")]
    NotError,
}

/// Either the entities a provider found in a row, or the failure it produced.
///
/// Serialized as a bare entity array or as `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractionResult {
    Entities(Vec<NamedEntity>),
    Error(ExtractionError),
}

impl ExtractionResult {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Error(ExtractionError::new(message))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn entities(&self) -> Result<&[NamedEntity], WrongVariant> {
        match self {
            Self::Entities(entities) => Ok(entities),
            Self::Error(error) => Err(WrongVariant::NotEntities(error.message.clone())),
        }
    }

    pub fn error(&self) -> Result<&ExtractionError, WrongVariant> {
        match self {
            Self::Error(error) => Ok(error),
            Self::Entities(_) => Err(WrongVariant::NotError),
        }
    }

    /// Number of grid rows this result occupies: one for an error,
    /// one per entity otherwise.
    pub fn height(&self) -> usize {
        match self {
            Self::Entities(entities) => entities.len(),
            Self::Error(_) => 1,
        }
    }
}

impl From<Vec<NamedEntity>> for ExtractionResult {
    fn from(entities: Vec<NamedEntity>) -> Self {
        Self::Entities(entities)
    }
}
