//! Registration, login and logout.

use axum::{Form, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use recipe_box_core::{UserId, Username};

use crate::db::UserRepository;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::session::UserIdentity;
use crate::models::user::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Form body for `/auth/register` and `/auth/login`.
#[derive(Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

// Keep passwords out of logs and `#[instrument]` fields.
impl std::fmt::Debug for CredentialsForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: Username,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Register a new account. Does not log the user in.
#[instrument(skip_all, fields(username = %form.username))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let users = UserRepository::new(state.pool());
    let user = AuthService::new(&users)
        .register(&form.username, &form.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user.id,
            username: user.username,
            message: "Registration successful!",
        }),
    ))
}

/// Verify credentials and start a session.
#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Json<UserResponse>> {
    let users = UserRepository::new(state.pool());
    let user: User = AuthService::new(&users)
        .authenticate(&form.username, &form.password)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Login failed"))?;

    let identity = UserIdentity {
        id: user.id,
        username: user.username.clone(),
    };
    set_current_user(&session, &identity).await.map_err(|e| {
        tracing::error!("Failed to set session: {}", e);
        AppError::Internal("session store unavailable".to_string())
    })?;
    set_sentry_user(&user.id, Some(user.username.as_str()));

    Ok(Json(UserResponse {
        id: user.id,
        username: user.username,
        message: "Logged in successfully!",
    }))
}

/// End the session. Succeeds whether or not anyone was logged in.
pub async fn logout(session: Session) -> Json<MessageResponse> {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to flush session: {}", e);
    }
    clear_sentry_user();

    Json(MessageResponse {
        message: "Logged out",
    })
}

/// The logged-in identity.
pub async fn me(RequireAuth(identity): RequireAuth) -> Json<UserIdentity> {
    Json(identity)
}
