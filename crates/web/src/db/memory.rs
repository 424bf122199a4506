//! In-memory store used by service and route tests.

use std::sync::Mutex;

use chrono::Utc;

use recipe_box_core::{CartId, CartItemId, RecipeId, SavedRecipeId, UserId, Username};

use super::{CartStore, RepositoryError, SavedRecipeStore, UserStore};
use crate::models::cart::{Cart, CartItem, NewCartItem};
use crate::models::saved_recipe::SavedRecipe;
use crate::models::user::User;

#[derive(Default)]
struct Tables {
    users: Vec<(User, String)>,
    saved: Vec<SavedRecipe>,
    carts: Vec<Cart>,
    next_item_id: i32,
}

/// A single-process stand-in for the Postgres repositories.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of carts across all users.
    pub fn cart_count(&self) -> usize {
        self.lock().carts.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn next_id(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX - 1) + 1
}

impl UserStore for MemoryStore {
    async fn create(&self, username: &Username, password_hash: &str) -> Result<User, RepositoryError> {
        let mut t = self.lock();
        if t.users.iter().any(|(u, _)| &u.username == username) {
            return Err(RepositoryError::Conflict("username already exists".to_owned()));
        }
        let user = User {
            id: UserId::new(next_id(t.users.len())),
            username: username.clone(),
            created_at: Utc::now(),
        };
        t.users.push((user.clone(), password_hash.to_owned()));
        Ok(user)
    }

    async fn get_with_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|(u, _)| &u.username == username)
            .cloned())
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.clone()))
    }
}

impl SavedRecipeStore for MemoryStore {
    async fn insert(
        &self,
        user_id: UserId,
        recipe_id: RecipeId,
        title: &str,
    ) -> Result<SavedRecipe, RepositoryError> {
        let mut t = self.lock();
        if !t.users.iter().any(|(u, _)| u.id == user_id) {
            return Err(RepositoryError::NotFound);
        }
        let saved = SavedRecipe {
            id: SavedRecipeId::new(next_id(t.saved.len())),
            user_id,
            recipe_id,
            title: title.to_owned(),
            created_at: Utc::now(),
        };
        t.saved.push(saved.clone());
        Ok(saved)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<SavedRecipe>, RepositoryError> {
        Ok(self
            .lock()
            .saved
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }
}

impl CartStore for MemoryStore {
    async fn add_item(
        &self,
        user_id: UserId,
        item: &NewCartItem,
    ) -> Result<CartItem, RepositoryError> {
        let mut t = self.lock();
        if !t.users.iter().any(|(u, _)| u.id == user_id) {
            return Err(RepositoryError::NotFound);
        }
        t.next_item_id += 1;
        let item_id = CartItemId::new(t.next_item_id);

        let cart_index = if let Some(i) = t.carts.iter().position(|c| c.user_id == user_id) {
            i
        } else {
            let id = CartId::new(next_id(t.carts.len()));
            t.carts.push(Cart {
                id,
                user_id,
                created_at: Utc::now(),
                items: Vec::new(),
            });
            t.carts.len() - 1
        };

        let cart = t.carts.get_mut(cart_index).ok_or(RepositoryError::NotFound)?;
        let stored = CartItem {
            id: item_id,
            cart_id: cart.id,
            recipe_id: item.recipe_id,
            ingredient_name: item.ingredient_name.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            created_at: Utc::now(),
        };
        cart.items.push(stored.clone());
        Ok(stored)
    }

    async fn get_for_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        Ok(self
            .lock()
            .carts
            .iter()
            .find(|c| c.user_id == user_id)
            .cloned())
    }
}
