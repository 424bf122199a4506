//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::WebConfig;
use crate::spoonacular::{SpoonacularClient, SpoonacularError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    pool: PgPool,
    spoonacular: SpoonacularClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Spoonacular client cannot be built from the
    /// configuration.
    pub fn new(config: WebConfig, pool: PgPool) -> Result<Self, SpoonacularError> {
        let spoonacular = SpoonacularClient::new(&config.spoonacular)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                spoonacular,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the Spoonacular client.
    #[must_use]
    pub fn spoonacular(&self) -> &SpoonacularClient {
        &self.inner.spoonacular
    }
}
