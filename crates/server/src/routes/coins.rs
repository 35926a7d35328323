//! Coin balance handlers.
//!
//! `/consultar-monedas` reads the balance and lazily creates the metafield
//! at zero for known customers. `/actualizar-monedas` applies a signed delta
//! with the result clamped at zero.

use axum::Json;
use axum::extract::State;
use rasca_gana_core::{Coins, CustomerId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

use super::{parse_amount, require_email};

/// Request body for `/consultar-monedas`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRequest {
    pub email: Option<String>,
    /// When present, skips the email search and fetches the customer by id.
    pub customer_id: Option<CustomerId>,
}

/// Response body for `/consultar-monedas`.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub ok: bool,
    pub monedas: Coins,
}

/// Read a customer's coin balance.
///
/// Unknown customers get `{ok:true, monedas:0}` without creating anything;
/// the zero is indistinguishable from a real zero balance on the wire, which
/// is what the widget wants.
#[instrument(skip(state, payload), fields(email = ?payload.email))]
pub async fn balance(
    State(state): State<AppState>,
    Json(payload): Json<BalanceRequest>,
) -> Result<Json<BalanceResponse>> {
    let email = require_email(payload.email.as_deref())?;

    let customer = match payload.customer_id {
        Some(id) => state.game().resolve_customer_by_id(id).await?,
        None => state.game().resolve_customer(&email).await?,
    };

    let Some(customer) = customer else {
        return Ok(Json(BalanceResponse {
            ok: true,
            monedas: Coins::ZERO,
        }));
    };

    let monedas = state.game().balance(&customer).await?;
    Ok(Json(BalanceResponse { ok: true, monedas }))
}

/// Request body for `/actualizar-monedas`.
///
/// `monedas` is a signed delta, raw JSON so numeric strings coerce.
#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    pub email: Option<String>,
    pub monedas: Option<serde_json::Value>,
}

/// Response body for `/actualizar-monedas`.
#[derive(Debug, Serialize)]
pub struct AdjustResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Coins>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

/// Apply a signed delta to a customer's balance, clamped at zero.
#[instrument(skip(state, payload), fields(email = ?payload.email))]
pub async fn adjust(
    State(state): State<AppState>,
    Json(payload): Json<AdjustRequest>,
) -> Result<Json<AdjustResponse>> {
    let email = require_email(payload.email.as_deref())?;

    let delta = payload
        .monedas
        .as_ref()
        .ok_or_else(|| AppError::InvalidInput("Faltan datos".to_string()))
        .and_then(|value| {
            parse_amount(value)
                .ok_or_else(|| AppError::InvalidInput("Monedas inválidas".to_string()))
        })?;

    let Some(customer) = state.game().resolve_customer(&email).await? else {
        return Ok(Json(AdjustResponse {
            ok: false,
            total: None,
            mensaje: Some("Cliente no encontrado".to_string()),
        }));
    };

    let total = state.game().adjust_balance(&customer, delta).await?;
    tracing::info!(email = %email, delta, total = total.as_i64(), "Balance adjusted");

    Ok(Json(AdjustResponse {
        ok: true,
        total: Some(total),
        mensaje: None,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_response_shape() {
        let response = BalanceResponse {
            ok: true,
            monedas: Coins::new(35),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"ok": true, "monedas": 35}));
    }

    #[test]
    fn test_adjust_response_skips_absent_fields() {
        let response = AdjustResponse {
            ok: true,
            total: Some(Coins::new(10)),
            mensaje: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"ok": true, "total": 10}));
    }

    #[test]
    fn test_balance_request_accepts_customer_id() {
        let payload: BalanceRequest = serde_json::from_value(serde_json::json!({
            "email": "a@b.co",
            "customerId": 7001,
        }))
        .unwrap();
        assert_eq!(payload.customer_id.unwrap().as_i64(), 7001);
    }
}
