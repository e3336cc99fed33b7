//! Shared helper functions for CLI commands.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use gridner::change::ChangeLog;
use gridner::grid::{Cell, CellValue, Table};

/// Read a JSON table.
pub fn load_table(path: &Path) -> anyhow::Result<Table> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read table {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid table file {}", path.display()))
}

/// Write a JSON table.
pub fn save_table(path: &Path, table: &Table) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(table)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write table {}", path.display()))
}

/// Undo stack of a table: `<table>.history.jsonl`.
pub fn history_log(table: &Path) -> ChangeLog {
    ChangeLog::new(sibling(table, "history.jsonl"))
}

/// Redo stack of a table: `<table>.redo.jsonl`.
pub fn redo_log(table: &Path) -> ChangeLog {
    ChangeLog::new(sibling(table, "redo.jsonl"))
}

fn sibling(table: &Path, extension: &str) -> PathBuf {
    table.with_extension(extension)
}

/// Resolve a column by name, falling back to a 0-based position.
pub fn resolve_column(table: &Table, column: &str) -> anyhow::Result<usize> {
    if let Some(position) = table.column_position(column) {
        return Ok(position);
    }
    match column.parse::<usize>() {
        Ok(position) if position < table.columns.len() => Ok(position),
        _ => anyhow::bail!(
            "No column '{}' (available: {})",
            column,
            table.column_names().join(", ")
        ),
    }
}

/// Parse `provider:key=value` extraction options.
pub fn parse_options(values: &[String]) -> anyhow::Result<BTreeMap<String, BTreeMap<String, String>>> {
    let mut options: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    for value in values {
        let (provider, setting) = value
            .split_once(':')
            .with_context(|| format!("Option '{}' is not provider:key=value", value))?;
        let (key, setting_value) = setting
            .split_once('=')
            .with_context(|| format!("Option '{}' is not provider:key=value", value))?;
        options
            .entry(provider.to_string())
            .or_default()
            .insert(key.to_string(), setting_value.to_string());
    }
    Ok(options)
}

/// Short display form of a cell.
pub fn cell_display(cell: Option<&Cell>) -> String {
    let Some(cell) = cell else {
        return String::new();
    };
    match &cell.value {
        CellValue::Error { error } => format!("!{}", error),
        value => value.as_text().unwrap_or_default(),
    }
}

/// Truncate a string to `max` characters, adding an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
