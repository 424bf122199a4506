//! Saved-recipe ledger.

use thiserror::Error;

use recipe_box_core::RecipeId;

use crate::db::{RepositoryError, SavedRecipeStore};
use crate::models::saved_recipe::SavedRecipe;
use crate::models::session::UserIdentity;

/// Maximum stored title length (matches the column width).
const MAX_TITLE_LENGTH: usize = 255;

/// Errors from ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Title was empty after trimming.
    #[error("recipe title cannot be empty")]
    EmptyTitle,

    /// Title longer than the column allows.
    #[error("recipe title must be at most {MAX_TITLE_LENGTH} characters")]
    TitleTooLong,

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Bookmarks recipes for a user.
pub struct LedgerService<'a, S> {
    store: &'a S,
}

impl<'a, S: SavedRecipeStore> LedgerService<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Append a bookmark. Saving the same recipe twice creates two entries.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::EmptyTitle` or `LedgerError::TitleTooLong` for an
    /// unusable title, or `LedgerError::Repository` if the insert fails.
    pub async fn save(
        &self,
        identity: &UserIdentity,
        recipe_id: RecipeId,
        title: &str,
    ) -> Result<SavedRecipe, LedgerError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LedgerError::EmptyTitle);
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(LedgerError::TitleTooLong);
        }

        let saved = self.store.insert(identity.id, recipe_id, title).await?;
        tracing::info!(user_id = %identity.id, recipe_id = %recipe_id, "Recipe saved");
        Ok(saved)
    }

    /// All bookmarks for the user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Repository` if the query fails.
    pub async fn list(&self, identity: &UserIdentity) -> Result<Vec<SavedRecipe>, LedgerError> {
        Ok(self.store.list_for_user(identity.id).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use recipe_box_core::Username;

    use super::*;
    use crate::db::UserStore;
    use crate::db::memory::MemoryStore;

    async fn identity(store: &MemoryStore, name: &str) -> UserIdentity {
        let user = store
            .create(&Username::parse(name).unwrap(), "hash")
            .await
            .unwrap();
        UserIdentity {
            id: user.id,
            username: user.username,
        }
    }

    #[tokio::test]
    async fn test_save_twice_keeps_both() {
        let store = MemoryStore::new();
        let alice = identity(&store, "alice").await;
        let ledger = LedgerService::new(&store);

        let first = ledger.save(&alice, RecipeId::new(715_538), "Apple Pie").await.unwrap();
        let second = ledger.save(&alice, RecipeId::new(715_538), "Apple Pie").await.unwrap();
        assert_ne!(first.id, second.id);

        let saved = ledger.list(&alice).await.unwrap();
        assert_eq!(saved.len(), 2);
        assert!(saved.iter().all(|s| s.recipe_id == RecipeId::new(715_538)));
    }

    #[tokio::test]
    async fn test_list_is_per_user_and_ordered() {
        let store = MemoryStore::new();
        let alice = identity(&store, "alice").await;
        let bob = identity(&store, "bob").await;
        let ledger = LedgerService::new(&store);

        ledger.save(&alice, RecipeId::new(1), "First").await.unwrap();
        ledger.save(&bob, RecipeId::new(2), "Bob's").await.unwrap();
        ledger.save(&alice, RecipeId::new(3), "  Second  ").await.unwrap();

        let titles: Vec<String> = ledger
            .list(&alice)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn test_save_rejects_blank_title() {
        let store = MemoryStore::new();
        let alice = identity(&store, "alice").await;
        let ledger = LedgerService::new(&store);

        assert!(matches!(
            ledger.save(&alice, RecipeId::new(1), "   ").await,
            Err(LedgerError::EmptyTitle)
        ));
        assert!(ledger.list(&alice).await.unwrap().is_empty());
    }
}
