//! Core types for Recipe Box.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod quantity;
pub mod recipe;
pub mod username;

pub use id::*;
pub use quantity::{Quantity, QuantityError};
pub use recipe::{Ingredient, Recipe};
pub use username::{Username, UsernameError};
