//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration and password login
//! - `recipes` - Ingredient search with per-recipe enrichment
//! - `saved` - Saved-recipe ledger
//! - `cart` - Per-user shopping cart
//!
//! Services borrow a store (or provider) rather than owning a pool, so route
//! handlers pass the Postgres repositories and tests pass in-memory ones.

pub mod auth;
pub mod cart;
pub mod recipes;
pub mod saved;
