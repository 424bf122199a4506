//! User management commands.

use thiserror::Error;

use recipe_box_web::db::UserRepository;
use recipe_box_web::services::auth::{AuthError, AuthService};

use super::{DatabaseUrlError, database_url};

#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    DatabaseUrl(#[from] DatabaseUrlError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Create a user with a password, as `/auth/register` would.
pub async fn create(username: &str, password: &str) -> Result<i32, UserError> {
    let url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = recipe_box_web::db::create_pool(&url).await?;

    let users = UserRepository::new(&pool);
    let user = AuthService::new(&users).register(username, password).await?;

    tracing::info!(
        "User created successfully! ID: {}, Username: {}",
        user.id,
        user.username
    );

    Ok(user.id.as_i32())
}
