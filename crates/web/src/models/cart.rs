//! Shopping cart domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use recipe_box_core::{CartId, CartItemId, Quantity, RecipeId, UserId};

/// A user's shopping cart. Each user has at most one.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    /// Items in insertion order.
    pub items: Vec<CartItem>,
}

/// An ingredient line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    /// Recipe the ingredient was taken from.
    pub recipe_id: RecipeId,
    pub ingredient_name: String,
    pub quantity: Quantity,
    pub unit: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A validated cart line waiting to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub recipe_id: RecipeId,
    pub ingredient_name: String,
    pub quantity: Quantity,
    pub unit: Option<String>,
}
