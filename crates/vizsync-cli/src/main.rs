//! vizsync CLI - Command-line interface for spreadsheet destinations
//!
//! Provides commands for:
//! - Listing, creating, editing and deleting destinations of a query
//! - Triggering a manual sync and following the job to completion
//! - Looking up dataset metadata in the data catalog
//! - Building result export links and exporting to a new spreadsheet
//! - Managing the stored API key and the configuration file

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod output;
mod prompt;

use commands::{
    auth::AuthCommand, catalog::CatalogCommand, completions::CompletionsCommand,
    config::ConfigCommand, destinations::DestinationsCommand, export::ExportCommand,
};
use context::AppContext;
use output::{get_formatter, OutputFormat};
use vizsync_core::domain::DestinationError;

#[derive(Debug, Parser)]
#[command(
    name = "vizsync",
    version,
    about = "Sync query visualizations into spreadsheets"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Server base URL, overrides `server.base_url`
    #[arg(long, global = true)]
    server: Option<String>,

    /// API key, overrides the configured and stored key
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage spreadsheet destinations of a query
    #[command(subcommand, alias = "dest")]
    Destinations(DestinationsCommand),
    /// Look up dataset metadata in the data catalog
    #[command(subcommand)]
    Catalog(CatalogCommand),
    /// Export query results
    #[command(subcommand)]
    Export(ExportCommand),
    /// Manage the stored API key
    #[command(subcommand)]
    Auth(AuthCommand),
    /// View and manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = AppContext::from_cli(&cli)?;

    // Setup tracing; logs go to stderr so that --json output stays parseable
    let filter = match cli.verbose {
        0 if cli.quiet => "warn".to_string(),
        0 => ctx.config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Destinations(cmd) => cmd.execute(&ctx).await,
        Commands::Catalog(cmd) => cmd.execute(&ctx).await,
        Commands::Export(cmd) => cmd.execute(&ctx).await,
        Commands::Auth(cmd) => cmd.execute(&ctx).await,
        Commands::Config(cmd) => cmd.execute(&ctx).await,
        Commands::Completions(cmd) => cmd.execute(&ctx).await,
    };

    if let Err(e) = result {
        // Destination errors were already shown as notifications
        if e.downcast_ref::<DestinationError>().is_none() {
            get_formatter(ctx.format == OutputFormat::Json).error(&format!("{e:#}"));
        }
        std::process::exit(1);
    }

    Ok(())
}
