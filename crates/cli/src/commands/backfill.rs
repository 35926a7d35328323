//! Coin balance backfill command.
//!
//! # Usage
//!
//! ```bash
//! # Create custom.monedas_acumuladas = "0" wherever it is missing
//! rg-cli backfill
//!
//! # Count what would change without writing
//! rg-cli backfill --dry-run
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPIFY_STORE_URL` - Shop domain
//! - `SHOPIFY_ACCESS_TOKEN` - Admin API token with customer write scope

use rasca_gana_server::backfill;
use rasca_gana_server::config::{ConfigError, GameConfig};
use rasca_gana_server::shopify::{ShopifyClient, ShopifyError};
use thiserror::Error;

/// Errors that can occur during a backfill run.
#[derive(Debug, Error)]
pub enum BackfillError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A Shopify call failed; the walk stopped at that point.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),
}

/// Run the backfill against the configured shop.
///
/// # Errors
///
/// Returns `BackfillError` if configuration fails to load or a Shopify call
/// aborts the walk. Re-running after a partial failure is safe.
pub async fn run(page_size: u32, dry_run: bool) -> Result<(), BackfillError> {
    let config = GameConfig::from_env()?;
    let client = ShopifyClient::new(&config)?;

    tracing::info!(store = %config.store, page_size, dry_run, "Starting coin balance backfill");
    let summary = backfill::run(&client, page_size, dry_run).await?;

    #[allow(clippy::print_stdout)]
    {
        if dry_run {
            println!("Backfill dry run: {summary}");
        } else {
            println!("Backfill complete: {summary}");
        }
    }
    Ok(())
}
