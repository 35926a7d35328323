//! Play eligibility and play registration handlers.
//!
//! Both endpoints treat unknown customers and replays as expected outcomes:
//! HTTP 200 with boolean flags, never an error status. The storefront widget
//! branches on `puedeJugar` / `yaJugo` and shows `mensaje` verbatim.

use axum::Json;
use axum::extract::State;
use rasca_gana_core::{Coins, OrderId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::game::{Eligibility, PlayOutcome, PlayPolicy};
use crate::state::AppState;

use super::{parse_amount, require_email};

/// Request body for `/check-juego`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPlayRequest {
    pub email: Option<String>,
    pub order_id: Option<OrderId>,
}

/// Response body for `/check-juego`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPlayResponse {
    pub puede_jugar: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
}

impl CheckPlayResponse {
    fn no(mensaje: &str) -> Self {
        Self {
            puede_jugar: false,
            mensaje: Some(mensaje.to_string()),
            order_id: None,
        }
    }
}

/// Check whether a customer may play right now.
#[instrument(skip(state, payload), fields(email = ?payload.email))]
pub async fn check(
    State(state): State<AppState>,
    Json(payload): Json<CheckPlayRequest>,
) -> Result<Json<CheckPlayResponse>> {
    let email = require_email(payload.email.as_deref())?;
    if state.game().policy() == PlayPolicy::PerOrder && payload.order_id.is_none() {
        return Err(AppError::InvalidInput("Faltan datos".to_string()));
    }

    let Some(customer) = state.game().resolve_customer(&email).await? else {
        return Ok(Json(CheckPlayResponse::no("Cliente no encontrado")));
    };

    let eligibility = state
        .game()
        .check_eligibility(&customer, payload.order_id.as_ref())
        .await?;

    let response = match eligibility {
        Eligibility::Eligible { order } => CheckPlayResponse {
            puede_jugar: true,
            mensaje: None,
            order_id: order,
        },
        Eligibility::AlreadyPlayed => CheckPlayResponse::no(already_played_message(
            state.game().policy(),
        )),
        Eligibility::NoPlayableOrder => CheckPlayResponse::no("No hay compras recientes"),
    };
    Ok(Json(response))
}

/// Request body for `/registrar-juego`.
///
/// `monedasGanadas` stays a raw JSON value so numeric strings coerce instead
/// of failing deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPlayRequest {
    pub email: Option<String>,
    pub order_id: Option<OrderId>,
    pub monedas_ganadas: Option<serde_json::Value>,
}

/// Response body for `/registrar-juego`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPlayResponse {
    pub ok: bool,
    pub ya_jugo: bool,
    pub mensaje: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monedas: Option<Coins>,
}

/// Record a play and credit the won coins.
#[instrument(skip(state, payload), fields(email = ?payload.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPlayRequest>,
) -> Result<Json<RegisterPlayResponse>> {
    let email = require_email(payload.email.as_deref())?;
    if state.game().policy() == PlayPolicy::PerOrder && payload.order_id.is_none() {
        return Err(AppError::InvalidInput("Faltan datos".to_string()));
    }

    let won = payload
        .monedas_ganadas
        .as_ref()
        .ok_or_else(|| AppError::InvalidInput("Faltan datos".to_string()))
        .and_then(|value| {
            parse_amount(value)
                .filter(|n| *n >= 0)
                .ok_or_else(|| AppError::InvalidInput("Monedas inválidas".to_string()))
        })?;

    let Some(customer) = state.game().resolve_customer(&email).await? else {
        return Ok(Json(RegisterPlayResponse {
            ok: false,
            ya_jugo: false,
            mensaje: "Cliente no encontrado".to_string(),
            monedas: None,
        }));
    };

    let outcome = state
        .game()
        .record_play(&customer, payload.order_id.as_ref(), Coins::new(won))
        .await?;

    let response = match outcome {
        PlayOutcome::Played { total } => {
            tracing::info!(email = %email, won, total = total.as_i64(), "Play recorded");
            RegisterPlayResponse {
                ok: true,
                ya_jugo: false,
                mensaje: format!("Ganaste {won} monedas"),
                monedas: Some(total),
            }
        }
        PlayOutcome::AlreadyPlayed => RegisterPlayResponse {
            ok: false,
            ya_jugo: true,
            mensaje: replay_message(state.game().policy()).to_string(),
            monedas: None,
        },
        PlayOutcome::NoPlayableOrder => RegisterPlayResponse {
            ok: false,
            ya_jugo: false,
            mensaje: "No hay compras recientes".to_string(),
            monedas: None,
        },
    };
    Ok(Json(response))
}

/// Message for an already-played eligibility check.
fn already_played_message(policy: PlayPolicy) -> &'static str {
    match policy {
        PlayPolicy::PerDay => "Ya jugaste hoy",
        PlayPolicy::PerOrder | PlayPolicy::PerLastPaidOrder => "Ya jugaste con esta compra",
    }
}

/// Message for a replayed registration. The per-order string carries a
/// trailing period; the widget matches it exactly.
fn replay_message(policy: PlayPolicy) -> &'static str {
    match policy {
        PlayPolicy::PerDay => "Ya jugaste hoy",
        PlayPolicy::PerOrder | PlayPolicy::PerLastPaidOrder => "Ya jugaste con esta compra.",
    }
}
