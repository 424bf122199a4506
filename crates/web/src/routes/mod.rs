//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (database ping)
//!
//! # Auth (rate limited)
//! POST /auth/register          - Create account (form: username, password)
//! POST /auth/login             - Start session (form: username, password)
//! POST /auth/logout            - End session
//! GET  /auth/me                - Current identity (requires auth)
//!
//! # Recipes
//! GET  /recipes/search         - Search (query: ingredients, number)
//! POST /recipes/search         - Search (form: ingredients, number)
//! GET  /recipes/saved          - Saved recipes (requires auth)
//! POST /recipes/saved          - Save a recipe (form: recipe_id, title; requires auth)
//!
//! # Cart (requires auth)
//! GET  /cart                   - Cart contents
//! POST /cart/add               - Add ingredient (form: ingredient_name, quantity, unit, recipe_id)
//! ```

pub mod auth;
pub mod cart;
pub mod recipes;

use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::SessionStore;
use tracing::Span;

use crate::middleware::{
    SignedSessionLayer, auth_rate_limiter, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .layer(auth_rate_limiter())
}

/// Create the recipe routes router.
pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/search",
            get(recipes::search_query).post(recipes::search_form),
        )
        .route("/saved", get(recipes::list_saved).post(recipes::save))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/auth", auth_routes())
        .nest("/recipes", recipe_routes())
        .nest("/cart", cart_routes())
}

/// Assemble the full application: routes, sessions and the middleware stack.
///
/// Sentry layers are added by the binary, outside this stack.
pub fn app<S>(state: AppState, session_layer: SignedSessionLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    routes()
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use axum::body::Body;
    use axum::http::{Request, Response, header};
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{SpoonacularConfig, WebConfig};
    use crate::middleware::session_layer_with_store;

    /// State whose database and recipe provider are both unreachable, so any
    /// request that gets past validation fails loudly.
    fn test_state() -> AppState {
        let config = WebConfig {
            database_url: SecretString::from("postgres://recipe_box@127.0.0.1:1/recipe_box"),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("kR8#mP2$vL9@nQ4&wX7*jF3!hT6^bY1%"),
            spoonacular: SpoonacularConfig {
                api_key: SecretString::from("test-key"),
                base_url: "http://127.0.0.1:1".to_string(),
                timeout: Duration::from_secs(2),
                search_count: 5,
                detail_concurrency: 4,
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(1))
            .connect_lazy("postgres://recipe_box@127.0.0.1:1/recipe_box")
            .unwrap();
        AppState::new(config, pool).unwrap()
    }

    fn test_app() -> Router {
        let state = test_state();
        let store = tower_sessions::MemoryStore::default();
        let sessions = session_layer_with_store(store, &state.config().session_secret, false);
        app(state, sessions)
    }

    fn form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("x-forwarded-for", "203.0.113.10")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("x-forwarded-for", "203.0.113.10")
            .body(Body::empty())
            .unwrap()
    }

    async fn error_message(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        json["error"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_sets_headers() {
        let response = test_app().oneshot(get_req("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        assert_eq!(response.headers()["x-frame-options"], "DENY");
    }

    #[tokio::test]
    async fn test_readiness_without_database() {
        let response = test_app().oneshot(get_req("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_protected_routes_require_login() {
        for request in [
            get_req("/cart"),
            form("/cart/add", "ingredient_name=flour&quantity=1&unit=cup&recipe_id=1"),
            get_req("/recipes/saved"),
            form("/recipes/saved", "recipe_id=1&title=Pie"),
            get_req("/auth/me"),
        ] {
            let response = test_app().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                error_message(response).await,
                "Please log in or register to continue"
            );
        }
    }

    #[tokio::test]
    async fn test_search_without_ingredients_is_bad_request() {
        let response = test_app()
            .oneshot(form("/recipes/search", "ingredients=+%2C+"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_bad_number_is_bad_request() {
        let response = test_app()
            .oneshot(get_req("/recipes/search?ingredients=apple&number=many"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_upstream_down_is_bad_gateway() {
        let response = test_app()
            .oneshot(get_req("/recipes/search?ingredients=apple,flour"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            error_message(response).await,
            "Recipe service is unavailable, please try again later"
        );
    }

    #[tokio::test]
    async fn test_register_weak_password_is_bad_request() {
        let response = test_app()
            .oneshot(form("/auth/register", "username=alice&password=short"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_with_malformed_username_is_unauthorized() {
        let response = test_app()
            .oneshot(form("/auth/login", "username=&password=password123"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_message(response).await, "Invalid username or password");
    }

    #[tokio::test]
    async fn test_logout_without_session_is_ok() {
        let response = test_app()
            .oneshot(form("/auth/logout", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_auth_rate_limit_returns_json_error() {
        let app = test_app();

        for _ in 0..5 {
            let response = app.clone().oneshot(form("/auth/logout", "")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.oneshot(form("/auth/logout", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(
            error_message(response).await,
            "Too many requests, please slow down"
        );
    }
}
