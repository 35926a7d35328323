//! HTTP route handlers for the game backend.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Liveness banner
//! GET  /health                 - Health check
//!
//! # Game
//! POST /check-juego            - Eligibility check for a customer
//! POST /registrar-juego        - Record a play and credit won coins
//!
//! # Coins
//! POST /consultar-monedas      - Coin balance (lazily created at zero)
//! POST /actualizar-monedas     - Apply a signed delta to the balance
//!
//! # Orders
//! POST /ultima-compra          - Newest paid order for an email
//! POST /webhook/order-created  - Shopify order-created webhook
//!
//! # Debug
//! GET  /debug?email=...        - Raw game state for one customer
//! ```
//!
//! Wire shapes are Spanish camelCase; the storefront widget depends on the
//! exact field names and message strings.

pub mod coins;
pub mod debug;
pub mod game;
pub mod orders;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use rasca_gana_core::Email;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::error::AppError;
use crate::state::AppState;

/// Liveness banner, also hit by uptime monitors.
async fn index() -> &'static str {
    "Backend Rasca y Gana activo"
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Create all routes for the game backend.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        // Game
        .route("/check-juego", post(game::check))
        .route("/registrar-juego", post(game::register))
        // Coins
        .route("/consultar-monedas", post(coins::balance))
        .route("/actualizar-monedas", post(coins::adjust))
        // Orders
        .route("/ultima-compra", post(orders::last_paid))
        .route("/webhook/order-created", post(orders::order_created))
        // Debug
        .route("/debug", get(debug::show))
}

/// CORS for the storefront widget and the Shopify admin.
///
/// Origins are restricted to `admin.shopify.com` and `*.myshopify.com`, both
/// https only.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin, _| {
            is_allowed_origin(origin)
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Whether an Origin header value may talk to this backend.
fn is_allowed_origin(origin: &HeaderValue) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    if origin == "https://admin.shopify.com" {
        return true;
    }
    origin
        .strip_prefix("https://")
        .is_some_and(|host| host.ends_with(".myshopify.com") && !host.contains('/'))
}

/// Validate the email field shared by every game request.
///
/// Missing or empty emails and malformed emails both reject with
/// `invalid_input` before any Shopify call is made.
pub(crate) fn require_email(raw: Option<&str>) -> Result<Email, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Faltan datos".to_string()))?;
    Email::parse(raw).map_err(|_| AppError::InvalidInput("Email inválido".to_string()))
}

/// Coerce a JSON coin amount to an integer.
///
/// Storefront widgets send both numbers and numeric strings; anything else
/// is `None`.
pub(crate) fn parse_amount(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_allowed_origin() {
        let allowed = [
            "https://admin.shopify.com",
            "https://tienda.myshopify.com",
            "https://otra-tienda.myshopify.com",
        ];
        for origin in allowed {
            assert!(
                is_allowed_origin(&HeaderValue::from_static(origin)),
                "expected {origin} to be allowed"
            );
        }

        let rejected = [
            "http://tienda.myshopify.com",
            "https://evil.com",
            "https://myshopify.com.evil.com",
            "https://evil.com/.myshopify.com",
            "https://admin.shopify.com.evil.com",
        ];
        for origin in rejected {
            assert!(
                !is_allowed_origin(&HeaderValue::from_static(origin)),
                "expected {origin} to be rejected"
            );
        }
    }

    #[test]
    fn test_require_email() {
        assert_eq!(
            require_email(Some(" Test@Example.com ")).unwrap().as_str(),
            "test@example.com"
        );

        let err = require_email(None).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref m) if m == "Faltan datos"));

        let err = require_email(Some("   ")).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref m) if m == "Faltan datos"));

        let err = require_email(Some("sin-arroba")).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref m) if m == "Email inválido"));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(&serde_json::json!(20)), Some(20));
        assert_eq!(parse_amount(&serde_json::json!(-5)), Some(-5));
        assert_eq!(parse_amount(&serde_json::json!("15")), Some(15));
        assert_eq!(parse_amount(&serde_json::json!(" 15 ")), Some(15));

        assert_eq!(parse_amount(&serde_json::json!(2.5)), None);
        assert_eq!(parse_amount(&serde_json::json!("veinte")), None);
        assert_eq!(parse_amount(&serde_json::json!(null)), None);
        assert_eq!(parse_amount(&serde_json::json!([20])), None);
    }
}
