//! Saved-recipe ledger entries.

use chrono::{DateTime, Utc};
use serde::Serialize;

use recipe_box_core::{RecipeId, SavedRecipeId, UserId};

/// A recipe bookmarked by a user.
///
/// Only the external id and the title are kept; details are fetched again
/// from the provider when needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedRecipe {
    pub id: SavedRecipeId,
    pub user_id: UserId,
    pub recipe_id: RecipeId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}
