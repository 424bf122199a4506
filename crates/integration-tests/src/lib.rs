//! Integration tests for Recipe Box.
//!
//! # Running Tests
//!
//! ```bash
//! # Storage tests: sqlx creates a scratch database per test from DATABASE_URL
//! DATABASE_URL=postgres://localhost/recipe_box cargo test -p recipe-box-integration-tests -- --ignored storage
//!
//! # HTTP flow tests: needs a migrated database and a running server
//! RECIPE_BOX_TEST_URL=http://localhost:3000 cargo test -p recipe-box-integration-tests -- --ignored http
//! ```
//!
//! # Test Categories
//!
//! - `storage` - Postgres repositories against real migrations
//! - `http_flow` - Register, login, save and cart over HTTP

use uuid::Uuid;

/// Base URL of a running server (configurable via environment).
#[must_use]
pub fn server_base_url() -> String {
    std::env::var("RECIPE_BOX_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A username that will not collide with earlier runs.
#[must_use]
pub fn unique_username(prefix: &str) -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(12).collect();
    format!("{prefix}_{suffix}")
}
