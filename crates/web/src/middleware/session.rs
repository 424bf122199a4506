//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions. The
//! `tower_sessions.session` table is created by the migrations, not at
//! startup. Session cookies are signed with a key derived from
//! `RECIPE_BOX_SESSION_SECRET`.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::WebConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "recipe_box_session";

/// Session expiry time in seconds (7 days of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Session layer with signed cookies.
pub type SignedSessionLayer<S> = SessionManagerLayer<S, SignedCookie>;

/// Create the session layer with the `PostgreSQL` store.
#[must_use]
pub fn create_session_layer(pool: &PgPool, config: &WebConfig) -> SignedSessionLayer<PostgresStore> {
    session_layer_with_store(
        PostgresStore::new(pool.clone()),
        &config.session_secret,
        config.is_secure(),
    )
}

/// Apply the cookie policy to any session store.
///
/// # Panics
///
/// If `secret` is shorter than 32 bytes. `WebConfig::from_env` rejects such
/// secrets before this is reached.
#[must_use]
pub fn session_layer_with_store<S: SessionStore + Clone>(
    store: S,
    secret: &SecretString,
    secure: bool,
) -> SignedSessionLayer<S> {
    let key = Key::derive_from(secret.expose_secret().as_bytes());

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::routing::get;
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, Session};

    use super::*;

    const SECRET: &str = "kR8#mP2$vL9@nQ4&wX7*jF3!hT6^bY1%";

    async fn remember(session: Session) -> StatusCode {
        session.insert("visits", 1_u32).await.unwrap();
        StatusCode::OK
    }

    async fn recall(session: Session) -> String {
        session
            .get::<u32>("visits")
            .await
            .unwrap()
            .map_or_else(|| "none".to_string(), |v| v.to_string())
    }

    fn app() -> Router {
        let layer = session_layer_with_store(MemoryStore::default(), &SecretString::from(SECRET), false);
        Router::new()
            .route("/remember", get(remember))
            .route("/recall", get(recall))
            .layer(layer)
    }

    async fn recall_with(app: Router, cookie: &str) -> String {
        let response = app
            .oneshot(
                Request::get("/recall")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_signed_cookie_round_trip_and_tamper_rejection() {
        let app = app();

        let response = app
            .clone()
            .oneshot(Request::get("/remember").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let cookie = set_cookie.split(';').next().unwrap().to_string();
        assert!(cookie.starts_with("recipe_box_session="));

        assert_eq!(recall_with(app.clone(), &cookie).await, "1");

        // Flip the final character of the session id; the signature no longer matches
        let mut tampered = cookie.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });
        assert_eq!(recall_with(app, &tampered).await, "none");
    }
}
