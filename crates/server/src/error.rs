//! Unified error handling for the HTTP surface.
//!
//! Handlers return `Result<T, AppError>`. Expected game outcomes (unknown
//! customer, already played) are not errors; they travel as 200 bodies with
//! boolean flags. `AppError` covers the two genuinely failing classes: bad
//! input and a failing Shopify upstream.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::game::GameError;
use crate::shopify::ShopifyError;

/// Application-level error type for the game endpoints.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request is missing or carries unusable fields. No Shopify call was
    /// made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Upstream(#[from] ShopifyError),
}

impl From<GameError> for AppError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::MissingOrderId => Self::InvalidInput("Faltan datos".to_string()),
            GameError::Shopify(e) => Self::Upstream(e),
        }
    }
}

/// JSON error body. The `code` field is machine-readable and appears only on
/// error responses; success shapes never carry it.
#[derive(Debug, Serialize)]
struct ErrorBody {
    ok: bool,
    error: String,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, code) = match &self {
            Self::InvalidInput(message) => {
                (StatusCode::BAD_REQUEST, message.clone(), "invalid_input")
            }
            Self::Upstream(err) => {
                // Upstream details go to the log, never to the storefront.
                tracing::error!(error = %err, "Shopify request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "Error consultando Shopify".to_string(),
                    "upstream_error",
                )
            }
        };

        let body = ErrorBody {
            ok: false,
            error,
            code,
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::InvalidInput("Faltan datos".to_string());
        assert_eq!(err.to_string(), "Invalid input: Faltan datos");
    }

    #[test]
    fn test_status_codes() {
        let response = AppError::InvalidInput("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::Upstream(ShopifyError::Unauthorized).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_game_error_mapping() {
        let err = AppError::from(GameError::MissingOrderId);
        assert!(matches!(err, AppError::InvalidInput(ref m) if m == "Faltan datos"));

        let err = AppError::from(GameError::Shopify(ShopifyError::Unauthorized));
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            ok: false,
            error: "Faltan datos".to_string(),
            code: "invalid_input",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"], "Faltan datos");
        assert_eq!(json["code"], "invalid_input");
    }
}
