//! Entity extraction command.

use std::path::Path;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{mpsc, watch};
use tracing::warn;

use gridner::change::NerChange;
use gridner::config::Settings;
use gridner_services::{
    BatchError, ExtractionBatch, ExtractionEvent, HttpTransport, ProviderRegistry,
};

use crate::cli::helpers::{
    history_log, load_table, parse_options, redo_log, resolve_column, save_table, truncate,
};

/// Run providers over a column and materialize the results next to it.
pub async fn cmd_extract(
    settings: &Settings,
    table_path: &Path,
    column: &str,
    provider_names: Vec<String>,
    workers: Option<usize>,
    options: &[String],
) -> anyhow::Result<()> {
    let registry = ProviderRegistry::load(&settings.providers_path())?;
    let mut table = load_table(table_path)?;
    let position = resolve_column(&table, column)?;
    let texts = table.column_texts(position);
    let overrides = parse_options(options)?;

    for name in overrides.keys() {
        if !provider_names.contains(name) {
            println!(
                "{} Ignoring options for '{}' (not selected)",
                style("!").yellow(),
                name
            );
        }
    }

    let transport = HttpTransport::from_settings(settings)?;
    let mut batch = ExtractionBatch::new(&registry, &transport, provider_names.clone())?
        .with_workers(workers.unwrap_or(settings.workers));
    for (provider, values) in overrides {
        batch = batch.with_options(&provider, values);
    }

    for name in &provider_names {
        if !registry.get(name)?.is_configured() {
            println!(
                "{} Provider '{}' is not configured; its cells will hold errors",
                style("!").yellow(),
                name
            );
        }
    }

    // Ctrl-C stops issuing new calls
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });

    let bar_style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")?
        .progress_chars("█▓░");

    let (event_tx, mut event_rx) = mpsc::channel::<ExtractionEvent>(100);
    let event_handler = tokio::spawn(async move {
        let mut progress: Option<ProgressBar> = None;

        while let Some(event) = event_rx.recv().await {
            match event {
                ExtractionEvent::Started { rows, providers } => {
                    println!(
                        "{} Extracting entities from {} rows with {} provider(s)",
                        style("→").cyan(),
                        rows,
                        providers
                    );
                    let bar = ProgressBar::new((rows * providers) as u64);
                    bar.set_style(bar_style.clone());
                    bar.set_message("Calling providers...");
                    progress = Some(bar);
                }
                ExtractionEvent::CellCompleted { row, provider, .. } => {
                    if let Some(ref bar) = progress {
                        bar.set_message(format!("row {} ({})", row + 1, provider));
                        bar.inc(1);
                    }
                }
                ExtractionEvent::CellFailed {
                    row,
                    provider,
                    error,
                } => {
                    warn!("{} failed on row {}: {}", provider, row + 1, error);
                    if let Some(ref bar) = progress {
                        bar.inc(1);
                    }
                }
                ExtractionEvent::Cancelled { completed } => {
                    if let Some(bar) = progress.take() {
                        bar.finish_and_clear();
                    }
                    println!(
                        "{} Extraction cancelled after {} call(s)",
                        style("!").yellow(),
                        completed
                    );
                }
                ExtractionEvent::Complete { succeeded, failed } => {
                    if let Some(bar) = progress.take() {
                        bar.finish_and_clear();
                    }
                    println!(
                        "{} Extraction complete: {} succeeded, {} failed",
                        style("✓").green(),
                        succeeded,
                        failed
                    );
                }
            }
        }
    });

    let outcome = batch.run(&texts, &cancel_rx, Some(event_tx)).await;
    interrupt.abort();
    let _ = event_handler.await;

    let results = match outcome {
        Ok(results) => results,
        Err(BatchError::Cancelled) => {
            println!("{} Table left unchanged", style("→").cyan());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut change = NerChange::new(position + 1, provider_names, results);
    change.apply(&mut table)?;
    save_table(table_path, &table)?;

    history_log(table_path).push(&change)?;
    redo_log(table_path).clear()?;

    println!(
        "{} Added {} column(s) and {} row(s) to {}",
        style("✓").green(),
        change.provider_names().len(),
        change.added_row_ids().len(),
        table_path.display()
    );
    for result in change.results().iter().flatten().filter(|r| r.is_error()) {
        if let Ok(error) = result.error() {
            println!("  {} {}", style("✗").red(), truncate(error.message(), 70));
            break;
        }
    }
    Ok(())
}
