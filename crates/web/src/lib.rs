//! Recipe Box web service library.
//!
//! Ingredient-driven recipe search backed by Spoonacular, plus per-user
//! saved recipes and a shopping cart. Exposed as a library so the binary,
//! the CLI and the integration tests share one implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod spoonacular;
pub mod state;
