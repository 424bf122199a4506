//! Domain models for the Recipe Box service.
//!
//! These are validated domain objects, separate from the database row types
//! in [`crate::db`].

pub mod cart;
pub mod saved_recipe;
pub mod session;
pub mod user;

pub use cart::{Cart, CartItem, NewCartItem};
pub use saved_recipe::SavedRecipe;
pub use session::{NotAuthenticated, UserIdentity};
pub use user::User;
