//! Change engine error types.

use thiserror::Error;

use crate::grid::GridError;

#[derive(Debug, Error)]
pub enum ChangeError {
    /// The grid no longer has the shape the change expects.
    #[error("Inconsistent grid state: {0}")]
    InconsistentState(String),

    /// The change record itself cannot be applied to any grid.
    #[error("Malformed change: {0}")]
    Malformed(String),

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
