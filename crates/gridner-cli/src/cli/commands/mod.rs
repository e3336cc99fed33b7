//! CLI command definitions and dispatch.

mod extract;
mod history;
mod providers;
mod show;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use gridner::config::{load_settings, LoadOptions};

#[derive(Parser)]
#[command(name = "gridner")]
#[command(about = "Extract named entities from table columns with external NER services")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to gridner.toml in the data directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage registered extraction providers
    Providers {
        #[command(subcommand)]
        command: ProvidersCommands,
    },

    /// Extract entities from a column and add one column per provider
    Extract {
        /// Table file (JSON)
        table: PathBuf,

        /// Source column name or 0-based position
        column: String,

        /// Provider names to run (repeatable)
        #[arg(short, long = "provider", required = true)]
        providers: Vec<String>,

        /// Concurrent provider calls (defaults to the configured worker count)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Per-run extraction option as provider:key=value (repeatable)
        #[arg(short, long = "option")]
        options: Vec<String>,
    },

    /// Revert the most recent extraction on a table
    Undo {
        /// Table file (JSON)
        table: PathBuf,
    },

    /// Re-apply the most recently undone extraction
    Redo {
        /// Table file (JSON)
        table: PathBuf,
    },

    /// Print a table
    Show {
        /// Table file (JSON)
        table: PathBuf,

        /// Maximum rows to print
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum ProvidersCommands {
    /// List registered providers and their settings
    List,

    /// Register a provider of a known class
    Add {
        /// Provider name
        name: String,

        /// Provider class (e.g. datatxt, nif, stanford-nlp)
        class: String,
    },

    /// Set a service setting or extraction default
    Set {
        /// Provider name
        name: String,

        /// Setting key
        key: String,

        /// New value
        value: String,
    },
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(&LoadOptions {
        config_path: cli.config,
    })?;

    match cli.command {
        Commands::Providers { command } => match command {
            ProvidersCommands::List => providers::cmd_providers_list(&settings).await,
            ProvidersCommands::Add { name, class } => {
                providers::cmd_providers_add(&settings, &name, &class).await
            }
            ProvidersCommands::Set { name, key, value } => {
                providers::cmd_providers_set(&settings, &name, &key, &value).await
            }
        },
        Commands::Extract {
            table,
            column,
            providers,
            workers,
            options,
        } => {
            extract::cmd_extract(&settings, &table, &column, providers, workers, &options).await
        }
        Commands::Undo { table } => history::cmd_undo(&table).await,
        Commands::Redo { table } => history::cmd_redo(&table).await,
        Commands::Show { table, limit } => show::cmd_show(&table, limit).await,
    }
}
