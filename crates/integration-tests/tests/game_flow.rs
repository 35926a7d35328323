//! Integration tests for the play endpoints.
//!
//! These tests require:
//! - The game server running (cargo run -p rasca-gana-server)
//! - Valid Shopify credentials in environment
//!
//! Run with: cargo test -p rasca-gana-integration-tests -- --ignored
//!
//! Emails are random, so every lookup lands on "Cliente no encontrado" and
//! nothing is ever written to the store.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the game server (configurable via environment).
fn server_base_url() -> String {
    std::env::var("RG_SERVER_URL").unwrap_or_else(|_| "http://localhost:10000".to_string())
}

/// An email no store has a customer for.
fn random_email() -> String {
    format!("integration-test-{}@example.com", Uuid::new_v4())
}

// ============================================================================
// Liveness
// ============================================================================

#[tokio::test]
#[ignore = "Requires running rasca-gana-server"]
async fn test_liveness_banner() {
    let base_url = server_base_url();

    let resp = reqwest::get(format!("{base_url}/"))
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert_eq!(body, "Backend Rasca y Gana activo");
}

#[tokio::test]
#[ignore = "Requires running rasca-gana-server"]
async fn test_health_endpoint() {
    let base_url = server_base_url();

    let resp = reqwest::get(format!("{base_url}/health"))
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read response"), "ok");
}

// ============================================================================
// Eligibility
// ============================================================================

#[tokio::test]
#[ignore = "Requires running rasca-gana-server"]
async fn test_check_juego_unknown_customer() {
    let base_url = server_base_url();
    let client = Client::new();

    let resp = client
        .post(format!("{base_url}/check-juego"))
        .json(&json!({"email": random_email(), "orderId": "1"}))
        .send()
        .await
        .expect("Failed to check eligibility");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body.get("puedeJugar"), Some(&Value::Bool(false)));
    assert_eq!(
        body.get("mensaje").and_then(Value::as_str),
        Some("Cliente no encontrado")
    );
}

#[tokio::test]
#[ignore = "Requires running rasca-gana-server"]
async fn test_check_juego_requires_email() {
    let base_url = server_base_url();
    let client = Client::new();

    let resp = client
        .post(format!("{base_url}/check-juego"))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("invalid_input")
    );
}

#[tokio::test]
#[ignore = "Requires running rasca-gana-server"]
async fn test_check_juego_rejects_malformed_email() {
    let base_url = server_base_url();
    let client = Client::new();

    let resp = client
        .post(format!("{base_url}/check-juego"))
        .json(&json!({"email": "sin-arroba", "orderId": "1"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(
        body.get("error").and_then(Value::as_str),
        Some("Email inválido")
    );
}

// ============================================================================
// Play Registration
// ============================================================================

#[tokio::test]
#[ignore = "Requires running rasca-gana-server"]
async fn test_registrar_juego_unknown_customer() {
    let base_url = server_base_url();
    let client = Client::new();

    let resp = client
        .post(format!("{base_url}/registrar-juego"))
        .json(&json!({
            "email": random_email(),
            "orderId": "1",
            "monedasGanadas": 10,
        }))
        .send()
        .await
        .expect("Failed to register play");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body.get("ok"), Some(&Value::Bool(false)));
    assert_eq!(body.get("yaJugo"), Some(&Value::Bool(false)));
    assert_eq!(
        body.get("mensaje").and_then(Value::as_str),
        Some("Cliente no encontrado")
    );
}

#[tokio::test]
#[ignore = "Requires running rasca-gana-server"]
async fn test_registrar_juego_requires_winnings() {
    let base_url = server_base_url();
    let client = Client::new();

    let resp = client
        .post(format!("{base_url}/registrar-juego"))
        .json(&json!({"email": random_email(), "orderId": "1"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(
        body.get("error").and_then(Value::as_str),
        Some("Faltan datos")
    );
}
