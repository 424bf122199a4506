//! Database operations for the Recipe Box `PostgreSQL` database.
//!
//! ## Tables (schema `recipe_box`)
//!
//! - `user` - Login name and Argon2 password hash
//! - `saved_recipe` - Bookmarked Spoonacular recipes (duplicates allowed)
//! - `cart` - One row per user, enforced by `UNIQUE (user_id)`
//! - `cart_item` - Ingredient lines pushed into a cart from recipes
//!
//! Sessions live in `tower_sessions.session`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p recipe-box-cli -- migrate
//! ```
//!
//! # Store traits
//!
//! Services depend on [`UserStore`], [`SavedRecipeStore`] and [`CartStore`]
//! rather than on the concrete repositories, so they can be exercised
//! without a database.

pub mod carts;
#[cfg(test)]
pub mod memory;
pub mod saved_recipes;
pub mod users;

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use recipe_box_core::{RecipeId, UserId, Username};

use crate::models::cart::{Cart, CartItem, NewCartItem};
use crate::models::saved_recipe::SavedRecipe;
use crate::models::user::User;

pub use carts::CartRepository;
pub use saved_recipes::SavedRecipeRepository;
pub use users::UserRepository;

/// Errors returned by repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The underlying query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The referenced row does not exist.
    #[error("not found")]
    NotFound,

    /// A stored value failed domain validation.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Map unique and foreign-key violations to domain errors.
pub(crate) fn classify(err: sqlx::Error, conflict: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(conflict.to_owned());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::NotFound;
        }
    }
    RepositoryError::Database(err)
}

/// Credential storage.
pub trait UserStore: Sync {
    /// Insert a user. Fails with `Conflict` if the username is taken.
    fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> impl Future<Output = Result<User, RepositoryError>> + Send;

    /// Fetch a user together with their password hash.
    fn get_with_password_hash(
        &self,
        username: &Username,
    ) -> impl Future<Output = Result<Option<(User, String)>, RepositoryError>> + Send;

    /// Fetch a user by ID.
    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, RepositoryError>> + Send;
}

/// Saved-recipe ledger storage.
pub trait SavedRecipeStore: Sync {
    /// Append a bookmark. No existence or duplicate check.
    fn insert(
        &self,
        user_id: UserId,
        recipe_id: RecipeId,
        title: &str,
    ) -> impl Future<Output = Result<SavedRecipe, RepositoryError>> + Send;

    /// All bookmarks for a user in insertion order.
    fn list_for_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<SavedRecipe>, RepositoryError>> + Send;
}

/// Cart storage.
pub trait CartStore: Sync {
    /// Find-or-create the user's cart and append `item` to it, atomically.
    fn add_item(
        &self,
        user_id: UserId,
        item: &NewCartItem,
    ) -> impl Future<Output = Result<CartItem, RepositoryError>> + Send;

    /// The user's cart with its items, if one exists.
    fn get_for_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<Cart>, RepositoryError>> + Send;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run the embedded migrations in `crates/web/migrations/`.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the history diverges.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
