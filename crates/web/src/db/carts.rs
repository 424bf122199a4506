//! Shopping cart repository.
//!
//! Each user owns at most one cart. `recipe_box.cart.user_id` carries a
//! unique constraint, and [`CartRepository::add_item`] finds-or-creates the
//! cart with an upsert inside the same transaction that inserts the item, so
//! concurrent first additions converge on a single cart.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use recipe_box_core::{CartId, CartItemId, Quantity, RecipeId, UserId};

use super::{CartStore, RepositoryError, classify};
use crate::models::cart::{Cart, CartItem, NewCartItem};

#[derive(FromRow)]
struct CartRow {
    id: CartId,
    user_id: UserId,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct CartItemRow {
    id: CartItemId,
    cart_id: CartId,
    recipe_id: RecipeId,
    ingredient_name: String,
    quantity: Quantity,
    unit: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: row.id,
            cart_id: row.cart_id,
            recipe_id: row.recipe_id,
            ingredient_name: row.ingredient_name,
            quantity: row.quantity,
            unit: row.unit,
            created_at: row.created_at,
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl CartStore for CartRepository<'_> {
    async fn add_item(
        &self,
        user_id: UserId,
        item: &NewCartItem,
    ) -> Result<CartItem, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // The no-op update makes RETURNING yield the existing row on conflict.
        let cart_id: CartId = sqlx::query_scalar(
            r"
            INSERT INTO recipe_box.cart (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id
            ",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| classify(e, "cart conflict"))?;

        let row = sqlx::query_as::<_, CartItemRow>(
            r"
            INSERT INTO recipe_box.cart_item (cart_id, recipe_id, ingredient_name, quantity, unit)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, cart_id, recipe_id, ingredient_name, quantity, unit, created_at
            ",
        )
        .bind(cart_id)
        .bind(item.recipe_id)
        .bind(&item.ingredient_name)
        .bind(item.quantity)
        .bind(item.unit.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn get_for_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let cart = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, user_id, created_at
            FROM recipe_box.cart
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(cart) = cart else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT id, cart_id, recipe_id, ingredient_name, quantity, unit, created_at
            FROM recipe_box.cart_item
            WHERE cart_id = $1
            ORDER BY id
            ",
        )
        .bind(cart.id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(Cart {
            id: cart.id,
            user_id: cart.user_id,
            created_at: cart.created_at,
            items: items.into_iter().map(CartItem::from).collect(),
        }))
    }
}
