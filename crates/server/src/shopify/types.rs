//! Wire types for the Shopify Admin API.
//!
//! REST resources deserialize straight off the Admin API JSON; the GraphQL
//! page types are the public shape the backfill walker consumes after the
//! client unwraps the edges/node nesting.

use rasca_gana_core::{CustomerId, MetafieldId, OrderId};
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// REST resources
// =============================================================================

/// A Shopify customer (REST shape, trimmed to what the game needs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Numeric customer ID.
    pub id: CustomerId,
    /// Customer email. Shopify allows customers without one.
    pub email: Option<String>,
}

/// A customer metafield.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metafield {
    /// Numeric metafield ID.
    pub id: MetafieldId,
    /// Namespace (the game keeps everything under `custom`).
    pub namespace: String,
    /// Key within the namespace.
    pub key: String,
    /// Stored value. Always a string here; older API versions returned
    /// integer-typed fields as JSON numbers, so deserialization accepts both.
    #[serde(deserialize_with = "value_as_string")]
    pub value: String,
    /// Shopify field type tag (e.g., `number_integer`).
    #[serde(rename = "type")]
    pub field_type: String,
}

/// A Shopify order (REST shape, trimmed to what the game needs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Numeric order ID.
    pub id: OrderId,
    /// Email the order was placed with.
    pub email: Option<String>,
    /// Payment status (`paid`, `pending`, `refunded`, ...).
    pub financial_status: Option<String>,
    /// Creation timestamp (ISO 8601).
    pub created_at: Option<String>,
}

impl Order {
    /// True when the order has been paid for.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.financial_status.as_deref() == Some("paid")
    }
}

/// Accept metafield values as strings or bare JSON scalars.
fn value_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Text(s) => s,
        Repr::Int(n) => n.to_string(),
        Repr::Float(f) => f.to_string(),
        Repr::Bool(b) => b.to_string(),
    })
}

// =============================================================================
// GraphQL page types (backfill walker)
// =============================================================================

/// One page of the customer walk.
#[derive(Debug, Clone)]
pub struct CustomerPage {
    /// Customers on this page.
    pub customers: Vec<CustomerSummary>,
    /// Whether another page follows.
    pub has_next_page: bool,
    /// Cursor to pass as `after` for the next page.
    pub end_cursor: Option<String>,
}

/// A customer as seen by the backfill walk.
#[derive(Debug, Clone)]
pub struct CustomerSummary {
    /// GraphQL global ID (`gid://shopify/Customer/...`).
    pub gid: String,
    /// Customer email, for log lines.
    pub email: Option<String>,
    /// Keys of the customer's metafields in the game namespace.
    pub metafield_keys: Vec<String>,
}

/// A mutation-level user error from `metafieldsSet`.
///
/// These are data, not transport failures: the walk logs them and moves on
/// to the next customer.
#[derive(Debug, Clone, Deserialize)]
pub struct UserError {
    /// Input field path the error refers to.
    pub field: Option<Vec<String>>,
    /// Human-readable message.
    pub message: String,
}
