//! Integration tests for the Rasca y Gana backend.
//!
//! These tests talk HTTP to a running server; they are all `#[ignore]`d so a
//! plain `cargo test` stays offline.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the server against a Shopify development store
//! cargo run -p rasca-gana-server
//!
//! # Run the ignored integration tests against it
//! cargo test -p rasca-gana-integration-tests -- --ignored
//! ```
//!
//! The target server is `http://localhost:10000` unless `RG_SERVER_URL` says
//! otherwise.
//!
//! # Test Categories
//!
//! - `game_flow` - liveness plus the eligibility and play endpoints
//! - `coins_and_orders` - balances, order lookup, webhook and debug
//!
//! Every test uses a random email that no store will know, so runs stay
//! read-only: unknown customers never get metafields written.
