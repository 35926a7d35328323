//! Rasca y Gana backend server.
//!
//! Serves the scratch-and-win game endpoints consumed by the storefront
//! widget, plus the order-created webhook that keeps the playable-order
//! metafield fresh.
//!
//! # Security
//!
//! This process holds a Shopify Admin API token with customer and order
//! scopes. The only intended callers are the storefront widget and Shopify
//! webhooks; CORS restricts browser origins accordingly.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Shopify Admin API as the only datastore (customer metafields)
//! - No database; every request reads fresh state from Shopify

#![cfg_attr(not(test), forbid(unsafe_code))]

use rasca_gana_server::config::GameConfig;
use rasca_gana_server::routes;
use rasca_gana_server::state::AppState;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = GameConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rasca_gana_server=info,tower_http=info".into());

    // Use JSON format on Render for structured log parsing, text format locally
    let is_render = std::env::var("RENDER").is_ok();
    let json_layer =
        is_render.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_render).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let addr = config.socket_addr();
    let policy = config.policy;

    // Build application state (Shopify client + game synchronizer)
    let state = AppState::new(config).expect("Failed to create application state");
    tracing::info!(%policy, "Game synchronizer ready");

    // Build router
    let app = routes::routes()
        .layer(routes::cors_layer())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record("latency_ms", latency.as_millis() as u64);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state);

    // Start server
    tracing::info!("rasca-gana-server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
