//! Quotebook CLI
//!
//! Command-line interface for Quotebook - a local quote collection that
//! merges quotes from a remote server.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quotebook_core::{Config, QuoteError};

mod commands;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "quotebook")]
#[command(about = "Quotebook - Local quote collection with server sync")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use an alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a random quote (default)
    Random {
        /// Pick from this category instead of the saved filter
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Add a new quote
    Add {
        /// Quote text
        text: String,
        /// Category (defaults to General)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List quotes
    #[command(alias = "ls")]
    List {
        /// Filter by category instead of the saved filter
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List all categories
    Categories,
    /// Show or set the saved category filter
    Filter {
        /// Category name, or "all"
        category: Option<String>,
    },
    /// Show the last quote viewed in this session
    Last,
    /// Export all quotes as JSON
    Export {
        /// Output file ("-" for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import quotes from a JSON file
    Import {
        /// File to import
        file: PathBuf,
        /// Replace the collection instead of appending
        #[arg(long)]
        replace: bool,
    },
    /// Sync once with the server
    Sync,
    /// Sync periodically until interrupted
    Watch {
        /// Seconds between syncs
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Clear stored quotes and restore the defaults
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show status
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, sync_url, sync_enabled, ...)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands work on the file directly
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(&config);

    let mut store = commands::open_store(&config);
    let mut session = commands::open_session(&config);

    let command = cli.command.unwrap_or(Commands::Random { category: None });

    let result = match command {
        Commands::Random { category } => {
            commands::quote::random(&store, &mut session, category, &output)
        }
        Commands::Add { text, category } => {
            commands::quote::add(&mut store, &mut session, text, category, &output)
        }
        Commands::List { category } => commands::quote::list(&store, category, &output),
        Commands::Categories => commands::category::list(&store, &output),
        Commands::Filter { category } => {
            commands::category::filter(&mut store, &mut session, category, &output)
        }
        Commands::Last => commands::quote::last(&store, &session, &output),
        Commands::Export { output: path } => commands::transfer::export(&store, path, &output),
        Commands::Import { file, replace } => {
            commands::transfer::import(&mut store, file, replace, &output)
        }
        Commands::Sync => commands::sync::sync(store, &config, &output).await,
        Commands::Watch { interval } => {
            commands::sync::watch(store, &config, interval, &output).await
        }
        Commands::Reset { yes } => commands::quote::reset(&mut store, &mut session, yes, &output),
        Commands::Status => commands::status::show(&store, &session, &config, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    };

    if let Some(hint) = result.as_ref().err().and_then(recovery_hint) {
        output.warn(hint);
    }

    result
}

/// Suggestion for a storage failure the user can fix
fn recovery_hint(error: &anyhow::Error) -> Option<&'static str> {
    match error.downcast_ref::<QuoteError>() {
        Some(QuoteError::Storage(storage_err)) if storage_err.is_recoverable() => {
            storage_err.recovery_suggestion()
        }
        _ => None,
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize file logging when QUOTEBOOK_LOG is set
///
/// Logs go to a file so they never mix with command output.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("QUOTEBOOK_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match create_log_file(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "quotebook_core={},quotebook_cli={}",
        log_level, log_level
    ));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    tracing::debug!("Logging to {:?}", log_path);
}

/// Create (truncate) the log file, making its directory first
fn create_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    File::create(path)
}
