//! Order lookup and webhook handlers.
//!
//! The order-created webhook keeps `ultima_orden_jugable` fresh so the
//! per-last-order policy rarely needs a live order lookup. Expected oddities
//! (no email, unknown customer) ack with 200: a non-2xx answer would make
//! Shopify retry a delivery that can never succeed.

use axum::Json;
use axum::extract::State;
use rasca_gana_core::{Email, OrderId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

use super::{parse_amount, require_email};

/// Request body for `/ultima-compra`.
#[derive(Debug, Deserialize)]
pub struct LastOrderRequest {
    pub email: Option<String>,
}

/// Response body for `/ultima-compra`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastOrderResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

/// Newest paid order for an email.
#[instrument(skip(state, payload), fields(email = ?payload.email))]
pub async fn last_paid(
    State(state): State<AppState>,
    Json(payload): Json<LastOrderRequest>,
) -> Result<Json<LastOrderResponse>> {
    let email = require_email(payload.email.as_deref())?;

    let response = match state.game().last_paid_order(&email).await? {
        Some(order) => LastOrderResponse {
            ok: true,
            order_id: Some(order.id),
            mensaje: None,
        },
        None => LastOrderResponse {
            ok: false,
            order_id: None,
            mensaje: Some("No hay compras pagadas".to_string()),
        },
    };
    Ok(Json(response))
}

/// Shopify order-created webhook payload. Everything beyond these fields is
/// ignored.
#[derive(Debug, Deserialize)]
pub struct OrderCreatedPayload {
    /// Order id; raw JSON because the contract is "numeric", not "number".
    pub id: Option<serde_json::Value>,
    pub email: Option<String>,
    pub financial_status: Option<String>,
}

/// Webhook acknowledgement body.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub ok: bool,
}

/// Handle an order-created webhook: remember the order as the customer's
/// newest playable one.
///
/// Stores the order regardless of payment state; at creation time the
/// payment is usually still pending.
#[instrument(skip(state, payload), fields(email = ?payload.email))]
pub async fn order_created(
    State(state): State<AppState>,
    Json(payload): Json<OrderCreatedPayload>,
) -> Result<Json<WebhookAck>> {
    let order_id = payload
        .id
        .as_ref()
        .and_then(|value| parse_amount(value))
        .ok_or_else(|| AppError::InvalidInput("Faltan datos".to_string()))?;

    let Some(raw_email) = payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    else {
        tracing::info!(order_id, "Order webhook without email, nothing to store");
        return Ok(Json(WebhookAck { ok: true }));
    };

    let Ok(email) = raw_email.parse::<Email>() else {
        tracing::warn!(order_id, email = raw_email, "Order webhook with unusable email");
        return Ok(Json(WebhookAck { ok: true }));
    };

    let Some(customer) = state.game().resolve_customer(&email).await? else {
        tracing::info!(order_id, email = %email, "Order webhook for unknown customer");
        return Ok(Json(WebhookAck { ok: true }));
    };

    state
        .game()
        .record_playable_order(&customer, &OrderId::from(order_id))
        .await?;
    tracing::info!(
        order_id,
        email = %email,
        financial_status = ?payload.financial_status,
        "Playable order stored"
    );

    Ok(Json(WebhookAck { ok: true }))
}
