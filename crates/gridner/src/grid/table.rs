//! In-memory grid with a column model, stored as JSON by the CLI.

use serde::{Deserialize, Serialize};

use super::{Cell, GridError, TabularGrid};

/// A named column pointing at a cell index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    pub cell_index: usize,
}

/// A row of cells. Missing trailing cells are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub cells: Vec<Option<Cell>>,
}

impl Row {
    pub fn new(cells: Vec<Option<Cell>>) -> Self {
        Self { cells }
    }

    pub fn blank(width: usize) -> Self {
        Self {
            cells: vec![None; width],
        }
    }

    pub fn get(&self, cell_index: usize) -> Option<&Cell> {
        self.cells.get(cell_index).and_then(Option::as_ref)
    }

    /// Drop trailing empty cells at or past `width`, the first cell index no
    /// column refers to.
    fn trim_unreferenced(&mut self, width: usize) {
        while self.cells.len() > width && matches!(self.cells.last(), Some(None)) {
            self.cells.pop();
        }
    }
}

/// Column model plus rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Table {
    /// A table whose columns use cell indexes equal to their positions.
    pub fn with_columns(names: &[&str]) -> Self {
        let columns = names
            .iter()
            .enumerate()
            .map(|(cell_index, name)| Column {
                name: (*name).to_string(),
                cell_index,
            })
            .collect();
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row of text values laid out by cell index.
    pub fn push_text_row(&mut self, values: &[&str]) {
        let cells = values.iter().map(|v| Some(Cell::text(*v))).collect();
        self.rows.push(Row::new(cells));
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, position: usize) -> Option<&Column> {
        self.columns.get(position)
    }

    /// Text of every row in a column; empty and error cells yield "".
    pub fn column_texts(&self, position: usize) -> Vec<String> {
        let Some(column) = self.columns.get(position) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .map(|row| {
                row.get(column.cell_index)
                    .and_then(|cell| cell.value.as_text())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Visible content: each row's cells in column order.
    ///
    /// Two tables with equal views are indistinguishable to a user, even if
    /// their cell indexes or row widths differ.
    pub fn view(&self) -> Vec<Vec<Option<Cell>>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| row.get(column.cell_index).cloned())
                    .collect()
            })
            .collect()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    fn next_cell_index(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.cell_index + 1)
            .max()
            .unwrap_or(0)
    }

    fn check_row(&self, row: usize) -> Result<(), GridError> {
        if row < self.rows.len() {
            Ok(())
        } else {
            Err(GridError::RowOutOfBounds {
                row,
                rows: self.rows.len(),
            })
        }
    }
}

impl TabularGrid for Table {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn insert_column(&mut self, name: &str, position: usize) -> Result<usize, GridError> {
        if position > self.columns.len() {
            return Err(GridError::ColumnOutOfBounds {
                position,
                columns: self.columns.len(),
            });
        }

        let cell_index = self.next_cell_index();
        // Stale cells may linger past the column model; the new column starts empty
        for row in &mut self.rows {
            if let Some(cell) = row.cells.get_mut(cell_index) {
                *cell = None;
            }
        }
        self.columns.insert(
            position,
            Column {
                name: name.to_string(),
                cell_index,
            },
        );
        Ok(cell_index)
    }

    fn remove_column(&mut self, position: usize) -> Result<(), GridError> {
        if position >= self.columns.len() {
            return Err(GridError::ColumnOutOfBounds {
                position,
                columns: self.columns.len(),
            });
        }

        let column = self.columns.remove(position);
        let referenced = self.next_cell_index();
        for row in &mut self.rows {
            if let Some(cell) = row.cells.get_mut(column.cell_index) {
                *cell = None;
            }
            row.trim_unreferenced(referenced);
        }
        Ok(())
    }

    fn row_width(&self, row: usize) -> Result<usize, GridError> {
        self.check_row(row)?;
        Ok(self.rows[row].cells.len())
    }

    fn pad_row(&mut self, row: usize, width: usize) -> Result<(), GridError> {
        self.check_row(row)?;
        let cells = &mut self.rows[row].cells;
        if cells.len() < width {
            cells.resize(width, None);
        }
        Ok(())
    }

    fn insert_row(&mut self, position: usize, width: usize) -> Result<(), GridError> {
        if position > self.rows.len() {
            return Err(GridError::RowOutOfBounds {
                row: position,
                rows: self.rows.len(),
            });
        }
        self.rows.insert(position, Row::blank(width));
        Ok(())
    }

    fn remove_row(&mut self, position: usize) -> Result<(), GridError> {
        self.check_row(position)?;
        self.rows.remove(position);
        Ok(())
    }

    fn cell(&self, row: usize, cell_index: usize) -> Result<Option<&Cell>, GridError> {
        self.check_row(row)?;
        Ok(self.rows[row].get(cell_index))
    }

    fn set_cell(
        &mut self,
        row: usize,
        cell_index: usize,
        cell: Option<Cell>,
    ) -> Result<(), GridError> {
        self.check_row(row)?;
        let cells = &mut self.rows[row].cells;
        if cells.len() <= cell_index {
            cells.resize(cell_index + 1, None);
        }
        cells[cell_index] = cell;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::with_columns(&["id", "text"]);
        table.push_text_row(&["1", "Lowell, MA"]);
        table.push_text_row(&["2", "Boston"]);
        table
    }

    #[test]
    fn test_insert_column_allocates_new_cell_index() {
        let mut table = sample();
        let cell_index = table.insert_column("ner", 1).unwrap();
        assert_eq!(cell_index, 2);
        assert_eq!(table.column_names(), vec!["id", "ner", "text"]);
        assert_eq!(table.column(1).unwrap().cell_index, 2);
    }

    #[test]
    fn test_insert_column_clears_stale_cells() {
        let mut table = sample();
        table.rows[0].cells.push(Some(Cell::text("hidden")));
        let cell_index = table.insert_column("ner", 2).unwrap();
        assert_eq!(table.cell(0, cell_index).unwrap(), None);
    }

    #[test]
    fn test_insert_column_out_of_bounds() {
        let mut table = sample();
        assert_eq!(
            table.insert_column("ner", 3),
            Err(GridError::ColumnOutOfBounds {
                position: 3,
                columns: 2
            })
        );
    }

    #[test]
    fn test_remove_column_clears_cells() {
        let mut table = sample();
        table.remove_column(0).unwrap();
        assert_eq!(table.column_names(), vec!["text"]);
        assert_eq!(table.cell(0, 0).unwrap(), None);
        assert_eq!(table.view()[0], vec![Some(Cell::text("Lowell, MA"))]);
    }

    #[test]
    fn test_remove_column_trims_padding() {
        let mut table = sample();
        let cell_index = table.insert_column("ner", 2).unwrap();
        table.pad_row(0, cell_index + 1).unwrap();
        table.set_cell(1, cell_index, Some(Cell::text("Boston"))).unwrap();

        table.remove_column(2).unwrap();
        assert_eq!(table, sample());

        // Cells a remaining column refers to are kept, even when empty
        let mut table = sample();
        table.set_cell(0, 1, None).unwrap();
        table.remove_column(0).unwrap();
        assert_eq!(table.rows[0].cells.len(), 2);
    }

    #[test]
    fn test_row_operations() {
        let mut table = sample();
        table.insert_row(1, 3).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.row_width(1).unwrap(), 3);

        table.set_cell(1, 5, Some(Cell::text("x"))).unwrap();
        assert_eq!(table.row_width(1).unwrap(), 6);

        table.remove_row(1).unwrap();
        assert_eq!(table.column_texts(1), vec!["Lowell, MA", "Boston"]);
        assert!(table.remove_row(2).is_err());
    }

    #[test]
    fn test_column_texts_skip_errors() {
        let mut table = sample();
        table.set_cell(1, 1, Some(Cell::error("bad"))).unwrap();
        assert_eq!(table.column_texts(1), vec!["Lowell, MA", ""]);
    }
}
