//! Rasca y Gana server library.
//!
//! This crate provides the game backend as a library, allowing it to be
//! tested and reused (the CLI drives the backfill walker through it).
//!
//! # Architecture
//!
//! Shopify is the only datastore. Game state lives in customer metafields
//! under the `custom` namespace, read and written through the Admin API on
//! every request. There is no local database, no cache, and no locking:
//! eligibility checks and plays are read-modify-write sequences whose race
//! window is an accepted property of the system.
//!
//! # Security
//!
//! The process holds a static Admin API token with customer and order
//! access. Keep it server-side; the storefront widget only ever talks to
//! this service.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backfill;
pub mod config;
pub mod error;
pub mod game;
pub mod routes;
pub mod shopify;
pub mod state;
