//! Saved-recipe ledger repository.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use recipe_box_core::{RecipeId, SavedRecipeId, UserId};

use super::{RepositoryError, SavedRecipeStore, classify};
use crate::models::saved_recipe::SavedRecipe;

#[derive(FromRow)]
struct SavedRecipeRow {
    id: SavedRecipeId,
    user_id: UserId,
    recipe_id: RecipeId,
    title: String,
    created_at: DateTime<Utc>,
}

impl From<SavedRecipeRow> for SavedRecipe {
    fn from(row: SavedRecipeRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            recipe_id: row.recipe_id,
            title: row.title,
            created_at: row.created_at,
        }
    }
}

/// Repository for saved-recipe database operations.
pub struct SavedRecipeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SavedRecipeRepository<'a> {
    /// Create a new saved-recipe repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl SavedRecipeStore for SavedRecipeRepository<'_> {
    async fn insert(
        &self,
        user_id: UserId,
        recipe_id: RecipeId,
        title: &str,
    ) -> Result<SavedRecipe, RepositoryError> {
        let row = sqlx::query_as::<_, SavedRecipeRow>(
            r"
            INSERT INTO recipe_box.saved_recipe (user_id, recipe_id, title)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, recipe_id, title, created_at
            ",
        )
        .bind(user_id)
        .bind(recipe_id)
        .bind(title)
        .fetch_one(self.pool)
        .await
        .map_err(|e| classify(e, "saved recipe conflict"))?;

        Ok(row.into())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<SavedRecipe>, RepositoryError> {
        let rows = sqlx::query_as::<_, SavedRecipeRow>(
            r"
            SELECT id, user_id, recipe_id, title, created_at
            FROM recipe_box.saved_recipe
            WHERE user_id = $1
            ORDER BY id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(SavedRecipe::from).collect())
    }
}
