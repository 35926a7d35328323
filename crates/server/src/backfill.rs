//! One-shot backfill: give every customer a coin balance of zero.
//!
//! Walks the whole customer base through the GraphQL connection API and
//! creates `custom.monedas_acumuladas = "0"` wherever it is missing. Safe to
//! re-run: customers that already carry the key are skipped, so a partial
//! failure converges on the next run.

use std::fmt;

use tracing::instrument;

use crate::game::{COINS_KEY, COINS_TYPE, METAFIELD_NAMESPACE};
use crate::shopify::{ShopifyClient, ShopifyError};

/// Customers fetched per GraphQL page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Counters for one backfill run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillSummary {
    /// Customers seen.
    pub scanned: u64,
    /// Balances created (or, in a dry run, that would have been).
    pub created: u64,
    /// Customers that already had a balance.
    pub skipped: u64,
    /// Customers whose balance write came back with `userErrors`.
    pub failed: u64,
}

impl fmt::Display for BackfillSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scanned {}, created {}, skipped {}, failed {}",
            self.scanned, self.created, self.skipped, self.failed
        )
    }
}

/// Walk all customers and initialize missing coin balances.
///
/// Mutation-level `userErrors` are logged and counted but do not abort the
/// walk; transport and GraphQL errors do.
///
/// # Errors
///
/// Returns the first `ShopifyError` raised by a page fetch or a metafield
/// write.
#[instrument(skip(client))]
pub async fn run(
    client: &ShopifyClient,
    page_size: u32,
    dry_run: bool,
) -> Result<BackfillSummary, ShopifyError> {
    let mut summary = BackfillSummary::default();
    let mut after: Option<String> = None;

    loop {
        let page = client
            .customers_page(page_size, after.as_deref(), METAFIELD_NAMESPACE)
            .await?;

        for customer in page.customers {
            summary.scanned += 1;
            let email = customer.email.as_deref().unwrap_or("<sin email>");

            if customer.metafield_keys.iter().any(|key| key == COINS_KEY) {
                tracing::debug!(customer = %customer.gid, email, "Balance present, skipping");
                summary.skipped += 1;
                continue;
            }

            if dry_run {
                tracing::info!(customer = %customer.gid, email, "Would create balance (dry run)");
                summary.created += 1;
                continue;
            }

            let user_errors = client
                .metafields_set(&customer.gid, METAFIELD_NAMESPACE, COINS_KEY, COINS_TYPE, "0")
                .await?;
            if user_errors.is_empty() {
                tracing::info!(customer = %customer.gid, email, "Balance created at 0");
                summary.created += 1;
            } else {
                for error in &user_errors {
                    tracing::warn!(
                        customer = %customer.gid,
                        email,
                        error = %error.message,
                        "Balance create rejected"
                    );
                }
                summary.failed += 1;
            }
        }

        if !page.has_next_page {
            break;
        }
        // hasNextPage without a cursor would re-fetch page one forever.
        match page.end_cursor {
            Some(cursor) => after = Some(cursor),
            None => break,
        }
    }

    tracing::info!(%summary, dry_run, "Backfill finished");
    Ok(summary)
}
