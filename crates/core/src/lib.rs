//! Rasca y Gana Core - Shared domain types.
//!
//! This crate provides the common types used across the Rasca y Gana
//! backend components:
//! - `server` - HTTP service synchronizing game state through Shopify
//! - `cli` - Command-line tools (metafield backfill, config checks)
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Game state
//! lives in Shopify customer metafields; these types give the rest of the
//! workspace a validated vocabulary for talking about it.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails, entity IDs, and coin balances

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
