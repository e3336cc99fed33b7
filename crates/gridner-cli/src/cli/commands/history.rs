//! Undo and redo of extraction changes.

use std::path::Path;

use console::style;

use gridner::change::ChangeLog;

use crate::cli::helpers::{history_log, load_table, redo_log, save_table};

/// Revert the newest change in the history log.
pub async fn cmd_undo(table_path: &Path) -> anyhow::Result<()> {
    replay(table_path, history_log(table_path), redo_log(table_path), false)
}

/// Re-apply the newest change in the redo log.
pub async fn cmd_redo(table_path: &Path) -> anyhow::Result<()> {
    replay(table_path, redo_log(table_path), history_log(table_path), true)
}

fn replay(table_path: &Path, from: ChangeLog, to: ChangeLog, apply: bool) -> anyhow::Result<()> {
    let verb = if apply { "redo" } else { "undo" };

    let Some(mut change) = from.pop()? else {
        println!("{} Nothing to {}", style("!").yellow(), verb);
        return Ok(());
    };

    let mut table = load_table(table_path)?;
    let outcome = if apply {
        change.apply(&mut table)
    } else {
        change.revert(&mut table)
    };

    if let Err(e) = outcome {
        // Keep the record so the stacks still describe the table
        from.push(&change)?;
        println!("{} Cannot {}: {}", style("✗").red(), verb, e);
        return Err(e.into());
    }

    save_table(table_path, &table)?;
    to.push(&change)?;

    let columns = change.provider_names().join(", ");
    if apply {
        println!(
            "{} Re-applied extraction ({}) at column {}",
            style("✓").green(),
            columns,
            change.column_index()
        );
    } else {
        println!(
            "{} Reverted extraction ({}) at column {}",
            style("✓").green(),
            columns,
            change.column_index()
        );
    }
    Ok(())
}
