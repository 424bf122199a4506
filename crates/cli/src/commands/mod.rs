//! CLI subcommands.

pub mod migrate;
pub mod recipes;
pub mod user;

use secrecy::SecretString;
use thiserror::Error;

/// Errors shared by commands that need a database.
#[derive(Debug, Error)]
pub enum DatabaseUrlError {
    #[error("Missing environment variable: RECIPE_BOX_DATABASE_URL (or DATABASE_URL)")]
    Missing,
}

/// Database URL from `RECIPE_BOX_DATABASE_URL`, falling back to `DATABASE_URL`.
pub fn database_url() -> Result<SecretString, DatabaseUrlError> {
    dotenvy::dotenv().ok();

    std::env::var("RECIPE_BOX_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| DatabaseUrlError::Missing)
}
