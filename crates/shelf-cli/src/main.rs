//! Shelf CLI
//!
//! Command-line interface for Shelf - browse a book catalog and keep a
//! reading list.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shelf_core::Config;

mod commands;
mod output;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Shelf - Browse a book catalog and build a reading list")]
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
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the GraphQL endpoint for this run
    #[arg(long, global = true, value_name = "URL")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// List books in the catalog
    #[command(alias = "ls")]
    Books {
        /// Show N randomly chosen books
        #[arg(short, long, value_name = "N", conflicts_with = "page")]
        random: Option<usize>,
        /// Show one page (starting at 1)
        #[arg(short, long)]
        page: Option<usize>,
        /// Books per page
        #[arg(long, requires = "page")]
        page_size: Option<usize>,
    },
    /// Search books by title
    Search {
        /// Text to look for (case-insensitive)
        term: String,
    },
    /// Show favorite titles from the catalog
    Featured,
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
        /// Configuration key (endpoint, page_size, favorite_titles, ...)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands work on the file itself, without overrides
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let mut config = Config::load_with_cli_override(cli.config.as_ref())?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }

    // Handle TUI (default when no command given)
    let command = match cli.command {
        Some(Commands::Tui) | None => return tui::run(config).await,
        Some(command) => command,
    };

    init_cli_logging();

    match command {
        Commands::Tui => unreachable!(), // Handled above
        Commands::Books {
            random,
            page,
            page_size,
        } => commands::books::list(&config, random, page, page_size, &output).await,
        Commands::Search { term } => commands::books::search(&config, term, &output).await,
        Commands::Featured => commands::books::featured(&config, &output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
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

/// Initialize logging for command mode
///
/// Only initializes if SHELF_LOG is set. Logs go to stderr so they never
/// mix with command output.
fn init_cli_logging() {
    let Ok(log_level) = std::env::var("SHELF_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!("shelf_core={},shelf_cli={}", log_level, log_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
