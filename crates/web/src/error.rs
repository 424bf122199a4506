//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.
//! Error bodies are JSON: `{"error": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::session::NotAuthenticated;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::services::recipes::GatewayError;
use crate::services::saved::LedgerError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Recipe search failed.
    #[error("Recipe search error: {0}")]
    Gateway(#[from] GatewayError),

    /// Saved-recipe operation failed.
    #[error("Saved recipe error: {0}")]
    Ledger(#[from] LedgerError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// No logged-in user.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<NotAuthenticated> for AppError {
    fn from(_: NotAuthenticated) -> Self {
        Self::NotAuthenticated
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

const INTERNAL_MESSAGE: &str = "Internal server error";

impl AppError {
    /// Whether this error is our fault and should be reported.
    fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Internal(_)
                | Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash)
                | Self::Ledger(LedgerError::Repository(_))
                | Self::Cart(CartError::Repository(_))
        )
    }

    fn status(&self) -> StatusCode {
        if self.is_server_error() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
        match self {
            Self::Auth(AuthError::DuplicateUsername) => StatusCode::CONFLICT,
            Self::Auth(AuthError::InvalidCredentials) | Self::NotAuthenticated => {
                StatusCode::UNAUTHORIZED
            }
            Self::Gateway(GatewayError::UpstreamUnavailable(_)) => StatusCode::BAD_GATEWAY,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Internal details are never exposed.
    fn message(&self) -> String {
        if self.is_server_error() {
            return INTERNAL_MESSAGE.to_string();
        }
        match self {
            Self::Auth(AuthError::DuplicateUsername) => "Username already exists".to_string(),
            Self::Auth(AuthError::InvalidCredentials) => {
                "Invalid username or password".to_string()
            }
            Self::Auth(err) => err.to_string(),
            Self::NotAuthenticated => "Please log in or register to continue".to_string(),
            Self::Gateway(GatewayError::UpstreamUnavailable(_)) => {
                "Recipe service is unavailable, please try again later".to_string()
            }
            Self::Gateway(err) => err.to_string(),
            Self::Ledger(err) => err.to_string(),
            Self::Cart(err) => err.to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::RateLimited => "Too many requests, please slow down".to_string(),
            Self::Database(_) | Self::Internal(_) => INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else if matches!(self, Self::Gateway(GatewayError::UpstreamUnavailable(_))) {
            tracing::warn!(error = %self, "Upstream recipe service failed");
        }

        let status = self.status();
        let body = ErrorBody {
            error: self.message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, username: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: username.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("recipes", "Searched recipes", Some(&[("ingredients", "apple,flour")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
