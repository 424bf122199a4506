//! Shopping cart routes.

use axum::{Form, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use recipe_box_core::RecipeId;

use crate::db::CartRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::cart::CartItem;
use crate::services::cart::{CartService, CartView};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub ingredient_name: String,
    pub quantity: String,
    #[serde(default)]
    pub unit: Option<String>,
    pub recipe_id: String,
}

#[derive(Debug, Serialize)]
pub struct AddToCartResponse {
    pub item: CartItem,
    pub message: &'static str,
}

/// The user's cart. Users who never added anything get an empty cart.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
) -> Result<Json<CartView>> {
    let store = CartRepository::new(state.pool());
    let view = CartService::new(&store).contents(&identity).await?;
    Ok(Json(view))
}

/// Add an ingredient line to the user's cart.
#[instrument(skip_all, fields(user_id = %identity.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Form(form): Form<AddToCartForm>,
) -> Result<(StatusCode, Json<AddToCartResponse>)> {
    let recipe_id: RecipeId = form
        .recipe_id
        .parse()
        .map_err(|_| AppError::BadRequest("recipe_id must be a number".to_string()))?;

    let store = CartRepository::new(state.pool());
    let item = CartService::new(&store)
        .add_item(
            &identity,
            recipe_id,
            &form.ingredient_name,
            &form.quantity,
            form.unit.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddToCartResponse {
            item,
            message: "Ingredient added to cart!",
        }),
    ))
}
