//! Core types for Rasca y Gana.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod coins;
pub mod email;
pub mod id;

pub use coins::Coins;
pub use email::{Email, EmailError};
pub use id::*;
