//! Transient recipe model.
//!
//! Recipes are built fresh for every search from the provider's responses and
//! are never persisted; only the external [`RecipeId`] and title survive into
//! the saved-recipe ledger and the cart.

use serde::{Deserialize, Serialize};

use super::RecipeId;

/// An ingredient line as described by the recipe provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Provider ingredient id, when the provider recognised the ingredient.
    pub id: Option<i32>,
    /// Normalised ingredient name (e.g. "flour").
    pub name: String,
    /// Amount called for by the recipe.
    pub amount: f64,
    /// Unit for `amount` (may be empty, e.g. "2 eggs").
    pub unit: String,
    /// The ingredient line as written in the recipe.
    pub original: String,
}

/// A recipe candidate returned from an ingredient search.
///
/// `image`, `ingredients` and `steps` come from the per-recipe detail call.
/// When that call fails they stay at their defaults (`""`, empty, empty) and
/// the recipe is still returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// External provider id.
    pub id: RecipeId,
    /// Recipe title.
    pub title: String,
    /// Thumbnail from the search hit, if the provider sent one.
    pub thumbnail: Option<String>,
    /// Full-size image from the detail call; empty when unavailable.
    pub image: String,
    /// Ingredients in recipe order.
    pub ingredients: Vec<Ingredient>,
    /// Instruction steps of the first instruction block, in order.
    pub steps: Vec<String>,
    /// How many of the searched ingredients the recipe uses.
    pub used_ingredient_count: u32,
    /// How many additional ingredients the recipe needs.
    pub missed_ingredient_count: u32,
}

impl Recipe {
    /// Create an unenriched recipe from search-step data.
    #[must_use]
    pub fn from_search(id: RecipeId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            thumbnail: None,
            image: String::new(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            used_ingredient_count: 0,
            missed_ingredient_count: 0,
        }
    }
}
