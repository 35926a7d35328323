//! Game state synchronizer.
//!
//! All durable game state lives in Shopify customer metafields under the
//! `custom` namespace; this module reads and writes it through
//! [`ShopifyClient`]. Every operation fetches fresh state per call. There is
//! no cache and no lock, so two concurrent plays for the same customer can
//! both pass the eligibility check. That window is an accepted property of
//! the game.
//!
//! `PlayPolicy` selects who may play when:
//!
//! - `PerOrder`: once per order id, tracked in `compras_jugadas`.
//! - `PerDay`: once per UTC day, tracked in `last_played`.
//! - `PerLastPaidOrder`: once per newest playable order, tracked in
//!   `last_played`; the playable order comes from `ultima_orden_jugable`
//!   (maintained by the order webhook) with a live order lookup as fallback.

mod policy;

use std::fmt;
use std::str::FromStr;

use rasca_gana_core::{Coins, CustomerId, Email, OrderId};
use tracing::instrument;

use crate::shopify::{Customer, Metafield, Order, ShopifyClient, ShopifyError};

// =============================================================================
// Metafield schema
// =============================================================================

/// Namespace holding every game metafield.
pub const METAFIELD_NAMESPACE: &str = "custom";

/// Accumulated coin balance, stringified integer.
pub const COINS_KEY: &str = "monedas_acumuladas";

/// Comma-joined order ids already played (per-order policy).
pub const PLAYED_ORDERS_KEY: &str = "compras_jugadas";

/// Last play marker: a UTC day (per-day) or a consumed order id
/// (per-last-order).
pub const LAST_PLAYED_KEY: &str = "last_played";

/// Newest playable order id, written by the order-created webhook.
pub const PLAYABLE_ORDER_KEY: &str = "ultima_orden_jugable";

/// Shopify type tag for the coin balance.
pub const COINS_TYPE: &str = "number_integer";

/// Shopify type tag for the played-orders history.
pub const PLAYED_ORDERS_TYPE: &str = "multi_line_text_field";

/// Shopify type tag for the single-value markers.
pub const TEXT_TYPE: &str = "single_line_text_field";

// =============================================================================
// Policy
// =============================================================================

/// Eligibility policy, selected by the `GAME_POLICY` environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayPolicy {
    /// One play per order id.
    #[default]
    PerOrder,
    /// One play per UTC day, regardless of orders.
    PerDay,
    /// One play per newest paid order; replays open when a newer order lands.
    PerLastPaidOrder,
}

impl FromStr for PlayPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-order" => Ok(Self::PerOrder),
            "per-day" => Ok(Self::PerDay),
            "per-last-order" => Ok(Self::PerLastPaidOrder),
            other => Err(format!(
                "unknown play policy '{other}' (expected per-order, per-day or per-last-order)"
            )),
        }
    }
}

impl fmt::Display for PlayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PerOrder => "per-order",
            Self::PerDay => "per-day",
            Self::PerLastPaidOrder => "per-last-order",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Results
// =============================================================================

/// Game-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The active policy needs an order id and the request carried none.
    #[error("order id is required to play")]
    MissingOrderId,

    /// Shopify call failed.
    #[error(transparent)]
    Shopify(#[from] ShopifyError),
}

/// Outcome of an eligibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    /// The customer may play. Under per-last-order, `order` names the order
    /// that opens the play.
    Eligible { order: Option<OrderId> },
    /// The policy's marker says this play already happened.
    AlreadyPlayed,
    /// Per-last-order only: the customer has no qualifying purchase.
    NoPlayableOrder,
}

/// Outcome of recording a play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The play was recorded; `total` is the new coin balance.
    Played { total: Coins },
    /// Fresh state says this play already happened. Not an error.
    AlreadyPlayed,
    /// Per-last-order only: no qualifying purchase to consume.
    NoPlayableOrder,
}

/// Debug view of a customer's game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    /// Current coin balance.
    pub coins: Coins,
    /// Order ids already played, split from the history metafield.
    pub played_orders: Vec<String>,
    /// Value of `ultima_orden_jugable`, when present.
    pub playable_order: Option<String>,
}

/// What a play would write, resolved against fresh metafield state.
enum Decision {
    Open {
        marker_key: &'static str,
        marker_type: &'static str,
        marker_value: String,
        order: Option<OrderId>,
    },
    Closed,
    NoCandidate,
}

// =============================================================================
// Synchronizer
// =============================================================================

/// Orchestrates game operations over the Shopify client.
#[derive(Debug, Clone)]
pub struct Synchronizer {
    client: ShopifyClient,
    policy: PlayPolicy,
}

impl Synchronizer {
    /// Create a synchronizer over `client` with the given policy.
    #[must_use]
    pub const fn new(client: ShopifyClient, policy: PlayPolicy) -> Self {
        Self { client, policy }
    }

    /// The active play policy.
    #[must_use]
    pub const fn policy(&self) -> PlayPolicy {
        self.policy
    }

    /// Look up a customer by email. Unknown email is `None`, not an error.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` when the lookup itself fails.
    #[instrument(skip(self))]
    pub async fn resolve_customer(&self, email: &Email) -> Result<Option<Customer>, ShopifyError> {
        self.client.search_customer_by_email(email.as_str()).await
    }

    /// Look up a customer by numeric id. Unknown id is `None`, not an error.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` when the lookup itself fails.
    #[instrument(skip(self))]
    pub async fn resolve_customer_by_id(
        &self,
        id: CustomerId,
    ) -> Result<Option<Customer>, ShopifyError> {
        self.client.get_customer(id).await
    }

    /// Check whether `customer` may play right now.
    ///
    /// # Errors
    ///
    /// Returns `GameError::MissingOrderId` when the per-order policy gets no
    /// order id, or the underlying `ShopifyError`.
    #[instrument(skip(self))]
    pub async fn check_eligibility(
        &self,
        customer: &Customer,
        order_id: Option<&OrderId>,
    ) -> Result<Eligibility, GameError> {
        let metafields = self.client.list_metafields(customer.id).await?;
        Ok(match self.decide(customer, order_id, &metafields).await? {
            Decision::Open { order, .. } => Eligibility::Eligible { order },
            Decision::Closed => Eligibility::AlreadyPlayed,
            Decision::NoCandidate => Eligibility::NoPlayableOrder,
        })
    }

    /// Record a play and credit `coins`, re-checking eligibility against
    /// fresh state first.
    ///
    /// Two writes, marker first: a crash between them loses the credit,
    /// never the marker, so a retry cannot double-spend.
    ///
    /// # Errors
    ///
    /// Returns `GameError::MissingOrderId` when the per-order policy gets no
    /// order id, or the underlying `ShopifyError`.
    #[instrument(skip(self))]
    pub async fn record_play(
        &self,
        customer: &Customer,
        order_id: Option<&OrderId>,
        coins: Coins,
    ) -> Result<PlayOutcome, GameError> {
        let metafields = self.client.list_metafields(customer.id).await?;
        let (marker_key, marker_type, marker_value) =
            match self.decide(customer, order_id, &metafields).await? {
                Decision::Open {
                    marker_key,
                    marker_type,
                    marker_value,
                    ..
                } => (marker_key, marker_type, marker_value),
                Decision::Closed => return Ok(PlayOutcome::AlreadyPlayed),
                Decision::NoCandidate => return Ok(PlayOutcome::NoPlayableOrder),
            };

        self.client
            .upsert_metafield(
                customer.id,
                METAFIELD_NAMESPACE,
                marker_key,
                &marker_value,
                marker_type,
            )
            .await?;

        let total = coins_value(&metafields).saturating_add_clamped(coins.as_i64());
        self.client
            .upsert_metafield(
                customer.id,
                METAFIELD_NAMESPACE,
                COINS_KEY,
                &total.to_string(),
                COINS_TYPE,
            )
            .await?;

        Ok(PlayOutcome::Played { total })
    }

    /// Current coin balance, creating the metafield at `"0"` when absent.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` when a Shopify call fails.
    #[instrument(skip(self))]
    pub async fn balance(&self, customer: &Customer) -> Result<Coins, ShopifyError> {
        let metafields = self.client.list_metafields(customer.id).await?;
        if let Some(value) = metafield_value(&metafields, COINS_KEY) {
            return Ok(Coins::parse_lossy(value));
        }

        // Lazy create at zero when the key is absent.
        self.client
            .create_metafield(customer.id, METAFIELD_NAMESPACE, COINS_KEY, "0", COINS_TYPE)
            .await?;
        Ok(Coins::ZERO)
    }

    /// Apply a signed delta to the balance, clamping the result at zero.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` when a Shopify call fails.
    #[instrument(skip(self))]
    pub async fn adjust_balance(
        &self,
        customer: &Customer,
        delta: i64,
    ) -> Result<Coins, ShopifyError> {
        let metafields = self.client.list_metafields(customer.id).await?;
        let total = coins_value(&metafields).saturating_add_clamped(delta);
        self.client
            .upsert_metafield(
                customer.id,
                METAFIELD_NAMESPACE,
                COINS_KEY,
                &total.to_string(),
                COINS_TYPE,
            )
            .await?;
        Ok(total)
    }

    /// Newest order with `financial_status == "paid"` for the email.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` when the order lookup fails.
    #[instrument(skip(self))]
    pub async fn last_paid_order(&self, email: &Email) -> Result<Option<Order>, ShopifyError> {
        let orders = self.client.recent_orders(email.as_str()).await?;
        Ok(orders.into_iter().find(Order::is_paid))
    }

    /// Store `order_id` as the newest playable order (webhook path).
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` when the write fails.
    #[instrument(skip(self))]
    pub async fn record_playable_order(
        &self,
        customer: &Customer,
        order_id: &OrderId,
    ) -> Result<(), ShopifyError> {
        self.client
            .upsert_metafield(
                customer.id,
                METAFIELD_NAMESPACE,
                PLAYABLE_ORDER_KEY,
                order_id.as_str(),
                TEXT_TYPE,
            )
            .await?;
        Ok(())
    }

    /// Read-only view of a customer's game state for the debug endpoint.
    ///
    /// Does not lazily create anything.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` when the metafield fetch fails.
    #[instrument(skip(self))]
    pub async fn snapshot(&self, customer: &Customer) -> Result<GameSnapshot, ShopifyError> {
        let metafields = self.client.list_metafields(customer.id).await?;
        let played_orders = metafield_value(&metafields, PLAYED_ORDERS_KEY)
            .map(split_history)
            .unwrap_or_default();

        Ok(GameSnapshot {
            coins: coins_value(&metafields),
            played_orders,
            playable_order: metafield_value(&metafields, PLAYABLE_ORDER_KEY)
                .map(ToString::to_string),
        })
    }

    /// Resolve the policy's play decision against a fresh metafield list.
    async fn decide(
        &self,
        customer: &Customer,
        order_id: Option<&OrderId>,
        metafields: &[Metafield],
    ) -> Result<Decision, GameError> {
        match self.policy {
            PlayPolicy::PerOrder => {
                let order = order_id.ok_or(GameError::MissingOrderId)?;
                let history = metafield_value(metafields, PLAYED_ORDERS_KEY).unwrap_or_default();
                if policy::history_contains(history, order.as_str()) {
                    return Ok(Decision::Closed);
                }
                Ok(Decision::Open {
                    marker_key: PLAYED_ORDERS_KEY,
                    marker_type: PLAYED_ORDERS_TYPE,
                    marker_value: policy::append_history(history, order.as_str()),
                    order: None,
                })
            }
            PlayPolicy::PerDay => {
                let today = policy::today_utc_string();
                let last = metafield_value(metafields, LAST_PLAYED_KEY).unwrap_or_default();
                if last.trim() == today {
                    return Ok(Decision::Closed);
                }
                Ok(Decision::Open {
                    marker_key: LAST_PLAYED_KEY,
                    marker_type: TEXT_TYPE,
                    marker_value: today,
                    order: None,
                })
            }
            PlayPolicy::PerLastPaidOrder => {
                // The webhook-maintained metafield is the cheap path; fall
                // back to a live order lookup for customers the webhook has
                // never seen.
                let cached = metafield_value(metafields, PLAYABLE_ORDER_KEY)
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(OrderId::new);
                let candidate = match cached {
                    Some(order) => Some(order),
                    None => self.live_playable_order(customer).await?,
                };
                let Some(candidate) = candidate else {
                    return Ok(Decision::NoCandidate);
                };

                let last = metafield_value(metafields, LAST_PLAYED_KEY).unwrap_or_default();
                if last.trim() == candidate.as_str() {
                    return Ok(Decision::Closed);
                }
                Ok(Decision::Open {
                    marker_key: LAST_PLAYED_KEY,
                    marker_type: TEXT_TYPE,
                    marker_value: candidate.as_str().to_string(),
                    order: Some(candidate),
                })
            }
        }
    }

    /// Live fallback for the per-last-order candidate.
    async fn live_playable_order(
        &self,
        customer: &Customer,
    ) -> Result<Option<OrderId>, ShopifyError> {
        let Some(email) = customer.email.as_deref() else {
            return Ok(None);
        };
        let orders = self.client.recent_orders(email).await?;
        Ok(orders.into_iter().find(Order::is_paid).map(|o| o.id))
    }
}

/// Value of the game metafield `key`, if present.
fn metafield_value<'a>(metafields: &'a [Metafield], key: &str) -> Option<&'a str> {
    metafields
        .iter()
        .find(|m| m.namespace == METAFIELD_NAMESPACE && m.key == key)
        .map(|m| m.value.as_str())
}

/// Coin balance from a metafield list, zero when absent or garbled.
fn coins_value(metafields: &[Metafield]) -> Coins {
    metafield_value(metafields, COINS_KEY).map_or(Coins::ZERO, Coins::parse_lossy)
}

/// Split a comma-joined history into its non-empty entries.
fn split_history(history: &str) -> Vec<String> {
    history
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rasca_gana_core::MetafieldId;

    use super::*;

    fn metafield(key: &str, value: &str) -> Metafield {
        Metafield {
            id: MetafieldId::new(1),
            namespace: METAFIELD_NAMESPACE.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            field_type: TEXT_TYPE.to_string(),
        }
    }

    #[test]
    fn test_play_policy_parse() {
        assert_eq!("per-order".parse::<PlayPolicy>().unwrap(), PlayPolicy::PerOrder);
        assert_eq!("per-day".parse::<PlayPolicy>().unwrap(), PlayPolicy::PerDay);
        assert_eq!(
            "per-last-order".parse::<PlayPolicy>().unwrap(),
            PlayPolicy::PerLastPaidOrder
        );
        assert_eq!(" Per-Day ".parse::<PlayPolicy>().unwrap(), PlayPolicy::PerDay);
    }

    #[test]
    fn test_play_policy_parse_rejects_unknown() {
        let err = "weekly".parse::<PlayPolicy>().unwrap_err();
        assert!(err.contains("weekly"));
    }

    #[test]
    fn test_play_policy_display_roundtrip() {
        for policy in [
            PlayPolicy::PerOrder,
            PlayPolicy::PerDay,
            PlayPolicy::PerLastPaidOrder,
        ] {
            assert_eq!(policy.to_string().parse::<PlayPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_metafield_value_matches_namespace_and_key() {
        let mut other = metafield(COINS_KEY, "50");
        other.namespace = "otra".to_string();
        let metafields = vec![other, metafield(COINS_KEY, "20")];

        assert_eq!(metafield_value(&metafields, COINS_KEY), Some("20"));
        assert_eq!(metafield_value(&metafields, LAST_PLAYED_KEY), None);
    }

    #[test]
    fn test_coins_value_defaults_to_zero() {
        assert_eq!(coins_value(&[]), Coins::ZERO);
        assert_eq!(
            coins_value(&[metafield(COINS_KEY, "no es numero")]),
            Coins::ZERO
        );
        assert_eq!(coins_value(&[metafield(COINS_KEY, "35")]), Coins::new(35));
    }

    #[test]
    fn test_split_history_drops_empty_entries() {
        assert_eq!(
            split_history("1001, 1002,,1003,"),
            vec!["1001", "1002", "1003"]
        );
        assert!(split_history("").is_empty());
    }
}
