//! Spoonacular recipe API client.
//!
//! # APIs
//!
//! - `GET /recipes/findByIngredients` - recipes that use a set of ingredients
//! - `GET /recipes/{id}/information` - full recipe detail (image, extended
//!   ingredients, analyzed instructions)
//!
//! Both endpoints authenticate with an `apiKey` query parameter. Nothing is
//! cached; every search goes to the API.
//!
//! # Example
//!
//! ```rust,ignore
//! use recipe_box_web::spoonacular::{RecipeProvider, SpoonacularClient};
//!
//! let client = SpoonacularClient::new(&config.spoonacular)?;
//! let hits = client
//!     .search_by_ingredients(&["apple".into(), "flour".into()], 3)
//!     .await?;
//! let detail = client.recipe_information(hits[0].id).await?;
//! ```

mod client;
pub mod types;

use std::future::Future;

use thiserror::Error;

use recipe_box_core::RecipeId;

pub use client::SpoonacularClient;
pub use types::{RecipeInformation, SearchHit};

/// Errors that can occur when talking to Spoonacular.
#[derive(Debug, Error)]
pub enum SpoonacularError {
    /// Transport failure (connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Spoonacular answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
    },

    /// The body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),
}

/// A source of recipes keyed by ingredients.
///
/// Implemented by [`SpoonacularClient`]; tests substitute a scripted fake.
pub trait RecipeProvider: Send + Sync {
    /// Find up to `count` recipes that use the given ingredients.
    fn search_by_ingredients(
        &self,
        ingredients: &[String],
        count: u32,
    ) -> impl Future<Output = Result<Vec<SearchHit>, SpoonacularError>> + Send;

    /// Fetch full detail for one recipe.
    fn recipe_information(
        &self,
        id: RecipeId,
    ) -> impl Future<Output = Result<RecipeInformation, SpoonacularError>> + Send;
}
