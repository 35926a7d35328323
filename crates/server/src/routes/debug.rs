//! Raw game state inspection, used while supporting the campaign.

use axum::Json;
use axum::extract::{Query, State};
use rasca_gana_core::Coins;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

use super::require_email;

/// Query parameters for `/debug`.
#[derive(Debug, Deserialize)]
pub struct DebugQuery {
    pub email: Option<String>,
}

/// Response body for `/debug`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugResponse {
    pub email: String,
    pub monedas: Coins,
    pub ultima_orden_jugable: Option<String>,
    pub jugadas: Vec<String>,
}

/// Show a customer's game state as stored in Shopify.
///
/// Unknown customers get an all-empty body rather than an error, so a
/// support person can tell "no such customer" apart from "HTTP problem".
#[instrument(skip(state, query), fields(email = ?query.email))]
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<DebugQuery>,
) -> Result<Json<DebugResponse>> {
    let email = require_email(query.email.as_deref())?;

    let Some(customer) = state.game().resolve_customer(&email).await? else {
        return Ok(Json(DebugResponse {
            email: email.into_inner(),
            monedas: Coins::ZERO,
            ultima_orden_jugable: None,
            jugadas: Vec::new(),
        }));
    };

    let snapshot = state.game().snapshot(&customer).await?;
    Ok(Json(DebugResponse {
        email: email.into_inner(),
        monedas: snapshot.coins,
        ultima_orden_jugable: snapshot.playable_order,
        jugadas: snapshot.played_orders,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_response_keeps_null_fields() {
        let response = DebugResponse {
            email: "a@b.co".to_string(),
            monedas: Coins::ZERO,
            ultima_orden_jugable: None,
            jugadas: Vec::new(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "email": "a@b.co",
                "monedas": 0,
                "ultimaOrdenJugable": null,
                "jugadas": [],
            })
        );
    }
}
