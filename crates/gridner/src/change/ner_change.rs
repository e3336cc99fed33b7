//! The extraction change: materialize results as columns and rows, and undo it.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::grid::{Cell, TabularGrid};
use crate::models::ExtractionResult;

use super::ChangeError;

/// Named-entity extraction results for a block of rows, ready to be written
/// into a grid.
///
/// `results[row][provider]` holds what provider `provider` returned for source
/// row `row`. Applying the change inserts one column per provider starting at
/// `column_index` and splits a source row into several grid rows when a
/// provider found more than one entity in it.
///
/// `added_row_ids` is the undo state: empty until `apply`, holding the grid
/// positions of the inserted rows afterwards, and cleared again by `revert`.
/// It is persisted with the record so a change can be undone after a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NerChange {
    #[serde(rename = "column")]
    column_index: usize,
    #[serde(rename = "services")]
    provider_names: Vec<String>,
    #[serde(rename = "entities")]
    results: Vec<Vec<ExtractionResult>>,
    #[serde(rename = "addedRows", default)]
    added_row_ids: Vec<usize>,
}

impl NerChange {
    pub fn new(
        column_index: usize,
        provider_names: Vec<String>,
        results: Vec<Vec<ExtractionResult>>,
    ) -> Self {
        Self {
            column_index,
            provider_names,
            results,
            added_row_ids: Vec::new(),
        }
    }

    pub fn column_index(&self) -> usize {
        self.column_index
    }

    pub fn provider_names(&self) -> &[String] {
        &self.provider_names
    }

    pub fn results(&self) -> &[Vec<ExtractionResult>] {
        &self.results
    }

    /// Grid positions of the rows inserted by the last `apply`, in insertion order.
    pub fn added_row_ids(&self) -> &[usize] {
        &self.added_row_ids
    }

    /// Serialize as a single change-log line (no trailing newline).
    pub fn to_json_line(&self) -> Result<String, ChangeError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json_line(line: &str) -> Result<Self, ChangeError> {
        Ok(serde_json::from_str(line.trim())?)
    }

    /// Apply while holding the grid's write lock for the whole edit.
    pub async fn apply_shared<G: TabularGrid>(
        &mut self,
        grid: &RwLock<G>,
    ) -> Result<(), ChangeError> {
        let mut guard = grid.write().await;
        self.apply(&mut *guard)
    }

    /// Revert while holding the grid's write lock for the whole edit.
    pub async fn revert_shared<G: TabularGrid>(
        &mut self,
        grid: &RwLock<G>,
    ) -> Result<(), ChangeError> {
        let mut guard = grid.write().await;
        self.revert(&mut *guard)
    }

    /// Insert the provider columns and place every result.
    ///
    /// The record and the grid are validated before anything is touched, so a
    /// failed apply leaves the grid unchanged.
    pub fn apply<G: TabularGrid + ?Sized>(&mut self, grid: &mut G) -> Result<(), ChangeError> {
        self.check_applicable(grid)?;
        self.added_row_ids.clear();

        let cell_indexes = self.create_columns(grid)?;
        self.insert_values(grid, &cell_indexes)?;

        info!(
            "Applied entity extraction: {} column(s) at {}, {} row(s) added",
            self.provider_names.len(),
            self.column_index,
            self.added_row_ids.len()
        );
        Ok(())
    }

    /// Remove the inserted rows, then the inserted columns.
    ///
    /// Fails with `InconsistentState`, leaving the grid as found, when the
    /// grid was changed in a way that invalidates the recorded edit.
    pub fn revert<G: TabularGrid + ?Sized>(&mut self, grid: &mut G) -> Result<(), ChangeError> {
        let mut rows = self.added_row_ids.clone();
        rows.sort_unstable_by(|a, b| b.cmp(a));

        let mut available = grid.row_count();
        for &row in &rows {
            if row >= available {
                return Err(ChangeError::InconsistentState(format!(
                    "needed to remove row {}, but only {} rows were available",
                    row, available
                )));
            }
            available -= 1;
        }

        let columns = self.provider_names.len();
        if self.column_index + columns > grid.column_count() {
            return Err(ChangeError::InconsistentState(format!(
                "needed to remove {} column(s) at {}, but the grid has {} columns",
                columns,
                self.column_index,
                grid.column_count()
            )));
        }

        // Highest positions first so earlier removals don't shift later ones
        for &row in &rows {
            grid.remove_row(row)?;
        }
        for _ in 0..columns {
            grid.remove_column(self.column_index)?;
        }

        info!(
            "Reverted entity extraction: {} column(s) at {}, {} row(s) removed",
            columns,
            self.column_index,
            rows.len()
        );
        self.added_row_ids.clear();
        Ok(())
    }

    fn check_applicable<G: TabularGrid + ?Sized>(&self, grid: &G) -> Result<(), ChangeError> {
        let providers = self.provider_names.len();
        if providers == 0 {
            return Err(ChangeError::Malformed("change has no providers".to_string()));
        }
        if let Some((row, results)) = self
            .results
            .iter()
            .enumerate()
            .find(|(_, results)| results.len() != providers)
        {
            return Err(ChangeError::Malformed(format!(
                "row {} has {} result(s) for {} provider(s)",
                row,
                results.len(),
                providers
            )));
        }
        if self.column_index > grid.column_count() {
            return Err(ChangeError::InconsistentState(format!(
                "cannot insert columns at {}, the grid has {} columns",
                self.column_index,
                grid.column_count()
            )));
        }
        if self.results.len() > grid.row_count() {
            return Err(ChangeError::InconsistentState(format!(
                "change covers {} rows, but the grid has {}",
                self.results.len(),
                grid.row_count()
            )));
        }
        Ok(())
    }

    /// Create one empty column per provider and return the cell indexes the
    /// grid assigned to them.
    fn create_columns<G: TabularGrid + ?Sized>(
        &self,
        grid: &mut G,
    ) -> Result<Vec<usize>, ChangeError> {
        let mut cell_indexes = Vec::with_capacity(self.provider_names.len());
        for (offset, name) in self.provider_names.iter().enumerate() {
            let cell_index = grid.insert_column(name, self.column_index + offset)?;
            debug!("Created column '{}' with cell index {}", name, cell_index);
            cell_indexes.push(cell_index);
        }
        Ok(cell_indexes)
    }

    fn insert_values<G: TabularGrid + ?Sized>(
        &mut self,
        grid: &mut G,
        cell_indexes: &[usize],
    ) -> Result<(), ChangeError> {
        if grid.row_count() == 0 {
            return Ok(());
        }

        // Every row must be wide enough to hold the new cells
        let min_row_width = cell_indexes.iter().copied().max().unwrap_or(0) + 1;
        for row in 0..grid.row_count() {
            if grid.row_width(row)? < min_row_width {
                grid.pad_row(row, min_row_width)?;
            }
        }

        let mut row_number = 0;
        for row_results in &self.results {
            let max_entities = row_results
                .iter()
                .map(ExtractionResult::height)
                .max()
                .unwrap_or(0);

            // Extra rows so that every entity gets its own row
            for offset in 1..max_entities {
                let position = row_number + offset;
                grid.insert_row(position, min_row_width)?;
                self.added_row_ids.push(position);
            }

            for (result, &cell_index) in row_results.iter().zip(cell_indexes) {
                match result {
                    ExtractionResult::Entities(entities) => {
                        for (offset, entity) in entities.iter().enumerate() {
                            grid.set_cell(row_number + offset, cell_index, Some(entity.to_cell()))?;
                        }
                    }
                    // Errors only go on the first row of the block
                    ExtractionResult::Error(error) => {
                        grid.set_cell(row_number, cell_index, Some(Cell::error(error.message())))?;
                    }
                }
            }

            if max_entities > 1 {
                debug!(
                    "Source row at {} expanded to {} rows",
                    row_number, max_entities
                );
            }
            row_number += max_entities.max(1);
        }
        Ok(())
    }
}
