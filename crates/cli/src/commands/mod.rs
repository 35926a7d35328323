//! CLI command implementations.

pub mod backfill;
pub mod check_config;
