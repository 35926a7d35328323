//! Rasca y Gana CLI - Backfill and configuration tools.
//!
//! # Usage
//!
//! ```bash
//! # Initialize every customer's coin balance to 0
//! rg-cli backfill
//!
//! # Preview without writing anything
//! rg-cli backfill --dry-run
//!
//! # Smaller pages for shops hitting rate limits
//! rg-cli backfill --page-size 50
//!
//! # Validate the environment configuration
//! rg-cli check-config
//! ```
//!
//! # Commands
//!
//! - `backfill` - Walk all customers and create missing coin balances
//! - `check-config` - Load and print the resolved configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rasca_gana_server::backfill::DEFAULT_PAGE_SIZE;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "rg-cli")]
#[command(author, version, about = "Rasca y Gana CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk all customers and create missing coin balances
    Backfill {
        /// Customers fetched per GraphQL page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,

        /// Walk and count without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Load and print the resolved configuration
    CheckConfig,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rg_cli=info,rasca_gana_server=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Backfill {
            page_size,
            dry_run,
        } => commands::backfill::run(page_size, dry_run).await?,
        Commands::CheckConfig => commands::check_config::run()?,
    }
    Ok(())
}
