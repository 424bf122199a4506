//! Recipe search and the saved-recipe ledger.

use axum::{
    Form, Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use recipe_box_core::{Recipe, RecipeId};

use crate::db::SavedRecipeRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::models::saved_recipe::SavedRecipe;
use crate::services::recipes::RecipeGateway;
use crate::services::saved::LedgerService;
use crate::state::AppState;

/// Shown when the provider found nothing.
pub const NO_RECIPES_MESSAGE: &str = "No recipes found for those ingredients";

/// Search input, from a form body or the query string.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub ingredients: String,
    /// Optional recipe count; blank means the configured default.
    #[serde(default)]
    pub number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub recipes: Vec<Recipe>,
    /// Recipes whose details could not be loaded.
    pub incomplete: Vec<RecipeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
pub struct SaveRecipeForm {
    pub recipe_id: String,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct SavedRecipeResponse {
    pub saved_recipe: SavedRecipe,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SavedRecipesResponse {
    pub saved_recipes: Vec<SavedRecipe>,
}

fn parse_count(number: Option<&str>, default: u32) -> Result<u32> {
    match number.map(str::trim).filter(|n| !n.is_empty()) {
        None => Ok(default),
        Some(n) => n
            .parse::<u32>()
            .map_err(|_| AppError::BadRequest("number must be a whole number".to_string())),
    }
}

async fn run_search(state: &AppState, params: SearchParams) -> Result<Json<SearchResponse>> {
    let spoonacular = &state.config().spoonacular;
    let count = parse_count(params.number.as_deref(), spoonacular.search_count)?;

    add_breadcrumb(
        "recipes",
        "Searched recipes",
        Some(&[("ingredients", params.ingredients.as_str())]),
    );

    let search = RecipeGateway::new(state.spoonacular(), spoonacular.detail_concurrency)
        .find_recipes_by_ingredients(&params.ingredients, count)
        .await?;

    let message = search.is_empty().then_some(NO_RECIPES_MESSAGE);
    Ok(Json(SearchResponse {
        recipes: search.recipes,
        incomplete: search.failed_enrichments,
        message,
    }))
}

/// `POST /recipes/search` with a form body.
#[instrument(skip_all, fields(ingredients = %params.ingredients))]
pub async fn search_form(
    State(state): State<AppState>,
    Form(params): Form<SearchParams>,
) -> Result<Json<SearchResponse>> {
    run_search(&state, params).await
}

/// `GET /recipes/search` with query parameters.
#[instrument(skip_all, fields(ingredients = %params.ingredients))]
pub async fn search_query(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    run_search(&state, params).await
}

/// The user's saved recipes, oldest first.
pub async fn list_saved(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
) -> Result<Json<SavedRecipesResponse>> {
    let store = SavedRecipeRepository::new(state.pool());
    let saved_recipes = LedgerService::new(&store).list(&identity).await?;
    Ok(Json(SavedRecipesResponse { saved_recipes }))
}

/// Bookmark a recipe.
#[instrument(skip_all, fields(user_id = %identity.id))]
pub async fn save(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Form(form): Form<SaveRecipeForm>,
) -> Result<(StatusCode, Json<SavedRecipeResponse>)> {
    let recipe_id: RecipeId = form
        .recipe_id
        .parse()
        .map_err(|_| AppError::BadRequest("recipe_id must be a number".to_string()))?;

    let store = SavedRecipeRepository::new(state.pool());
    let saved_recipe = LedgerService::new(&store)
        .save(&identity, recipe_id, &form.title)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SavedRecipeResponse {
            saved_recipe,
            message: "Recipe saved successfully!",
        }),
    ))
}
