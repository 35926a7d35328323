//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::GameConfig;
use crate::game::Synchronizer;
use crate::shopify::{ShopifyClient, ShopifyError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the game synchronizer.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: GameConfig,
    game: Synchronizer,
}

impl AppState {
    /// Create the application state, building the Shopify client from the
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the Shopify client cannot be built from the
    /// configured store URL or token.
    pub fn new(config: GameConfig) -> Result<Self, ShopifyError> {
        let client = ShopifyClient::new(&config)?;
        Ok(Self::with_client(config, client))
    }

    /// Create state over an explicit client.
    ///
    /// Router tests use this with a client pointed at a mock Shopify server.
    #[must_use]
    pub fn with_client(config: GameConfig, client: ShopifyClient) -> Self {
        let game = Synchronizer::new(client, config.policy);
        Self {
            inner: Arc::new(AppStateInner { config, game }),
        }
    }

    /// Get a reference to the game configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.inner.config
    }

    /// Get a reference to the game synchronizer.
    #[must_use]
    pub fn game(&self) -> &Synchronizer {
        &self.inner.game
    }
}
