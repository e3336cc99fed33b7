//! Table display command.

use std::path::Path;

use console::style;

use gridner::grid::Judgment;

use crate::cli::helpers::{cell_display, history_log, load_table, redo_log, truncate};

const CELL_WIDTH: usize = 24;

/// Print a table with its undo/redo depth.
pub async fn cmd_show(table_path: &Path, limit: usize) -> anyhow::Result<()> {
    let table = load_table(table_path)?;

    let header: Vec<String> = table
        .column_names()
        .iter()
        .map(|name| format!("{:<width$}", truncate(name, CELL_WIDTH), width = CELL_WIDTH))
        .collect();
    let rule = "-".repeat((CELL_WIDTH + 1) * table.columns.len().max(1));

    println!("\n{}", style(table_path.display()).bold());
    println!("{}", rule);
    println!("{}", style(header.join(" ")).bold());
    println!("{}", rule);

    for row in table.rows.iter().take(limit) {
        let cells: Vec<String> = table
            .columns
            .iter()
            .map(|column| {
                let cell = row.get(column.cell_index);
                let text = format!(
                    "{:<width$}",
                    truncate(&cell_display(cell), CELL_WIDTH),
                    width = CELL_WIDTH
                );
                match cell {
                    Some(cell) if cell.is_error() => style(text).red().to_string(),
                    Some(cell)
                        if cell
                            .recon
                            .as_ref()
                            .is_some_and(|r| r.judgment == Judgment::Matched) =>
                    {
                        style(text).cyan().to_string()
                    }
                    _ => text,
                }
            })
            .collect();
        println!("{}", cells.join(" "));
    }

    if table.rows.len() > limit {
        println!("... {} more row(s)", table.rows.len() - limit);
    }

    println!(
        "\n{} rows, {} columns, {} undo / {} redo",
        table.rows.len(),
        table.columns.len(),
        history_log(table_path).len()?,
        redo_log(table_path).len()?
    );
    Ok(())
}
