//! Tabular grid interface the change engine edits.
//!
//! Rows hold cells addressed by *cell index*; columns map a display position
//! to a cell index. Inserting a column allocates a fresh cell index, which is
//! not necessarily equal to the column's position.

mod cell;
mod table;

pub use cell::{Cell, CellValue, Judgment, Recon, ReconCandidate};
pub use table::{Column, Row, Table};

use thiserror::Error;

/// Errors from out-of-range grid operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("Row {row} is out of bounds ({rows} rows)")]
    RowOutOfBounds { row: usize, rows: usize },

    #[error("Column position {position} is out of bounds ({columns} columns)")]
    ColumnOutOfBounds { position: usize, columns: usize },
}

/// The host grid as seen by the change engine.
pub trait TabularGrid {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    /// Insert a column named `name` at display `position`, with every row's
    /// cell for it empty. Returns the cell index assigned to the new column.
    fn insert_column(&mut self, name: &str, position: usize) -> Result<usize, GridError>;

    /// Remove the column at display `position`, clearing its cells.
    ///
    /// Reverting a change restores the visible content of the grid (each
    /// row's cells in column order). Implementations may also drop padding
    /// no column refers to, but are not required to.
    fn remove_column(&mut self, position: usize) -> Result<(), GridError>;

    /// Number of cells currently stored in a row.
    fn row_width(&self, row: usize) -> Result<usize, GridError>;

    /// Append empty cells to a row until it holds at least `width` cells.
    fn pad_row(&mut self, row: usize, width: usize) -> Result<(), GridError>;

    /// Insert a blank row of `width` empty cells at `position`.
    fn insert_row(&mut self, position: usize, width: usize) -> Result<(), GridError>;

    fn remove_row(&mut self, position: usize) -> Result<(), GridError>;

    fn cell(&self, row: usize, cell_index: usize) -> Result<Option<&Cell>, GridError>;

    /// Store a cell, growing the row if needed.
    fn set_cell(
        &mut self,
        row: usize,
        cell_index: usize,
        cell: Option<Cell>,
    ) -> Result<(), GridError>;
}
