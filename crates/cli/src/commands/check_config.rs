//! Configuration check command.
//!
//! # Usage
//!
//! ```bash
//! rg-cli check-config
//! ```
//!
//! Loads `GameConfig::from_env()` exactly as the server does and prints the
//! resolved values, token redacted. Exits non-zero when a variable is
//! missing or rejected, which makes it usable as a deploy-time gate.

use rasca_gana_server::config::{ConfigError, GameConfig};

/// Load and print the resolved configuration.
///
/// # Errors
///
/// Returns `ConfigError` when a required variable is missing or fails
/// validation.
pub fn run() -> Result<(), ConfigError> {
    let config = GameConfig::from_env()?;

    #[allow(clippy::print_stdout)]
    {
        println!("Configuration OK");
        println!("  store:       {}", config.store);
        println!("  api version: {}", config.api_version);
        println!("  policy:      {}", config.policy);
        println!("  bind:        {}", config.socket_addr());
        println!("  token:       [REDACTED]");
    }
    Ok(())
}
