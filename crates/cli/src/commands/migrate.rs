//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! rb-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `RECIPE_BOX_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! `crates/web/migrations/`, named `{timestamp}_{description}.sql`. They
//! create the `recipe_box` schema (users, saved recipes, carts) and the
//! `tower_sessions` schema used by the session store.

use thiserror::Error;

use super::{DatabaseUrlError, database_url};

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    DatabaseUrl(#[from] DatabaseUrlError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending migrations.
pub async fn run() -> Result<(), MigrationError> {
    let url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = recipe_box_web::db::create_pool(&url).await?;

    tracing::info!("Running migrations...");
    recipe_box_web::db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
