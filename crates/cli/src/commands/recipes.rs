//! Recipe search from the command line.
//!
//! Uses the same gateway as `/recipes/search`, configured from the
//! `SPOONACULAR_*` and `RECIPE_*` environment variables.

use thiserror::Error;

use recipe_box_web::config::{ConfigError, SpoonacularConfig};
use recipe_box_web::services::recipes::{GatewayError, RecipeGateway};
use recipe_box_web::spoonacular::{SpoonacularClient, SpoonacularError};

#[derive(Debug, Error)]
pub enum RecipesError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Spoonacular client error: {0}")]
    Client(#[from] SpoonacularError),

    #[error(transparent)]
    Search(#[from] GatewayError),
}

/// Search and log each recipe with its enrichment status.
pub async fn search(ingredients: &str, number: Option<u32>) -> Result<(), RecipesError> {
    dotenvy::dotenv().ok();

    let config = SpoonacularConfig::from_env()?;
    let client = SpoonacularClient::new(&config)?;
    let count = number.unwrap_or(config.search_count);

    let search = RecipeGateway::new(&client, config.detail_concurrency)
        .find_recipes_by_ingredients(ingredients, count)
        .await?;

    if search.is_empty() {
        tracing::info!("No recipes found for those ingredients");
        return Ok(());
    }

    for recipe in &search.recipes {
        let status = if search.failed_enrichments.contains(&recipe.id) {
            "details unavailable"
        } else {
            "complete"
        };
        tracing::info!(
            "{} - {} ({} ingredients, {} steps, {})",
            recipe.id,
            recipe.title,
            recipe.ingredients.len(),
            recipe.steps.len(),
            status
        );
    }

    Ok(())
}
