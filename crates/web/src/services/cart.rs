//! Cart aggregator.
//!
//! Ingredient lines are appended to the user's single cart. Identical
//! ingredients are not merged.

use serde::Serialize;
use thiserror::Error;

use recipe_box_core::{CartId, Quantity, QuantityError, RecipeId};

use crate::db::{CartStore, RepositoryError};
use crate::models::cart::{CartItem, NewCartItem};
use crate::models::session::UserIdentity;

const MAX_INGREDIENT_NAME_LENGTH: usize = 255;
const MAX_UNIT_LENGTH: usize = 50;

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("ingredient name cannot be empty")]
    EmptyIngredientName,

    #[error("ingredient name must be at most {MAX_INGREDIENT_NAME_LENGTH} characters")]
    IngredientNameTooLong,

    #[error("unit must be at most {MAX_UNIT_LENGTH} characters")]
    UnitTooLong,

    #[error(transparent)]
    InvalidQuantity(#[from] QuantityError),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// What a user sees when they open their cart.
///
/// A user who never added anything has no cart row; they get `cart_id: None`
/// and no items.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CartView {
    pub cart_id: Option<CartId>,
    pub items: Vec<CartItem>,
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart operations for authenticated users.
pub struct CartService<'a, S> {
    store: &'a S,
}

impl<'a, S: CartStore> CartService<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Add an ingredient line, creating the cart on first use.
    ///
    /// A blank `unit` is stored as no unit.
    ///
    /// # Errors
    ///
    /// Returns a validation variant for a bad name, quantity or unit, or
    /// `CartError::Repository` if the write fails.
    pub async fn add_item(
        &self,
        identity: &UserIdentity,
        recipe_id: RecipeId,
        ingredient_name: &str,
        quantity: &str,
        unit: Option<&str>,
    ) -> Result<CartItem, CartError> {
        let ingredient_name = ingredient_name.trim();
        if ingredient_name.is_empty() {
            return Err(CartError::EmptyIngredientName);
        }
        if ingredient_name.chars().count() > MAX_INGREDIENT_NAME_LENGTH {
            return Err(CartError::IngredientNameTooLong);
        }

        let quantity = Quantity::parse(quantity)?;

        let unit = unit.map(str::trim).filter(|u| !u.is_empty());
        if unit.is_some_and(|u| u.chars().count() > MAX_UNIT_LENGTH) {
            return Err(CartError::UnitTooLong);
        }

        let item = NewCartItem {
            recipe_id,
            ingredient_name: ingredient_name.to_owned(),
            quantity,
            unit: unit.map(str::to_owned),
        };

        let stored = self.store.add_item(identity.id, &item).await?;
        tracing::info!(
            user_id = %identity.id,
            cart_id = %stored.cart_id,
            recipe_id = %recipe_id,
            "Ingredient added to cart"
        );
        Ok(stored)
    }

    /// The user's cart contents in insertion order. Reading never creates a
    /// cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the query fails.
    pub async fn contents(&self, identity: &UserIdentity) -> Result<CartView, CartError> {
        let view = self
            .store
            .get_for_user(identity.id)
            .await?
            .map(|cart| CartView {
                cart_id: Some(cart.id),
                items: cart.items,
            })
            .unwrap_or_default();
        Ok(view)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures::future::join_all;
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
    async fn test_first_add_creates_cart() {
        let store = MemoryStore::new();
        let alice = identity(&store, "alice").await;
        let carts = CartService::new(&store);

        assert!(carts.contents(&alice).await.unwrap().is_empty());
        assert_eq!(store.cart_count(), 0);

        let item = carts
            .add_item(&alice, RecipeId::new(42), "flour", "1.5", Some("cups"))
            .await
            .unwrap();
        assert_eq!(item.ingredient_name, "flour");
        assert_eq!(item.quantity.to_string(), "1.5");
        assert_eq!(item.unit.as_deref(), Some("cups"));

        let view = carts.contents(&alice).await.unwrap();
        assert_eq!(view.cart_id, Some(item.cart_id));
        assert_eq!(view.items, vec![item]);
    }

    #[tokio::test]
    async fn test_identical_items_are_not_merged() {
        let store = MemoryStore::new();
        let alice = identity(&store, "alice").await;
        let carts = CartService::new(&store);

        carts
            .add_item(&alice, RecipeId::new(1), "egg", "2", None)
            .await
            .unwrap();
        carts
            .add_item(&alice, RecipeId::new(1), "egg", "2", None)
            .await
            .unwrap();

        let view = carts.contents(&alice).await.unwrap();
        assert_eq!(view.items.len(), 2);
        assert_eq!(store.cart_count(), 1);
    }

    // MemoryStore serializes adds under one lock; the racing case is covered
    // against Postgres in integration-tests/tests/storage.rs.
    #[tokio::test]
    async fn test_repeated_adds_share_one_cart() {
        let store = MemoryStore::new();
        let alice = identity(&store, "alice").await;
        let carts = CartService::new(&store);

        let adds = (0..8).map(|i| {
            let name = format!("ingredient {i}");
            let alice = alice.clone();
            let carts = &carts;
            async move {
                carts
                    .add_item(&alice, RecipeId::new(7), &name, "1", Some(""))
                    .await
            }
        });
        let results = join_all(adds).await;

        assert!(results.iter().all(Result::is_ok));
        assert_eq!(store.cart_count(), 1);
        assert_eq!(carts.contents(&alice).await.unwrap().items.len(), 8);
    }

    #[tokio::test]
    async fn test_add_item_validation() {
        let store = MemoryStore::new();
        let alice = identity(&store, "alice").await;
        let carts = CartService::new(&store);

        assert!(matches!(
            carts.add_item(&alice, RecipeId::new(1), "  ", "1", None).await,
            Err(CartError::EmptyIngredientName)
        ));
        assert!(matches!(
            carts.add_item(&alice, RecipeId::new(1), "salt", "a pinch", None).await,
            Err(CartError::InvalidQuantity(QuantityError::NotANumber(_)))
        ));
        assert!(matches!(
            carts.add_item(&alice, RecipeId::new(1), "salt", "0", None).await,
            Err(CartError::InvalidQuantity(QuantityError::NotPositive))
        ));
        assert_eq!(store.cart_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_unit_is_stored_as_none() {
        let store = MemoryStore::new();
        let alice = identity(&store, "alice").await;
        let carts = CartService::new(&store);

        let item = carts
            .add_item(&alice, RecipeId::new(1), "egg", "3", Some("   "))
            .await
            .unwrap();
        assert_eq!(item.unit, None);
    }
}
