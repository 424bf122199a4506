//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `RECIPE_BOX_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `RECIPE_BOX_BASE_URL` - Public URL of the service
//! - `RECIPE_BOX_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//! - `SPOONACULAR_API_KEY` - Spoonacular API key
//!
//! ## Optional
//! - `RECIPE_BOX_HOST` - Bind address (default: 127.0.0.1)
//! - `RECIPE_BOX_PORT` - Listen port (default: 3000)
//! - `SPOONACULAR_BASE_URL` - API root (default: <https://api.spoonacular.com>)
//! - `SPOONACULAR_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `RECIPE_SEARCH_COUNT` - Recipes returned per search (default: 5)
//! - `RECIPE_DETAIL_CONCURRENCY` - Parallel detail lookups per search (default: 4)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Largest `number` the Spoonacular search endpoint accepts.
pub const MAX_SEARCH_COUNT: u32 = 100;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the service
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Spoonacular API configuration
    pub spoonacular: SpoonacularConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Spoonacular API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct SpoonacularConfig {
    /// API key sent as the `apiKey` query parameter
    pub api_key: SecretString,
    /// API root, without trailing slash
    pub base_url: String,
    /// Timeout applied to every outbound request
    pub timeout: Duration,
    /// Default number of recipes per search
    pub search_count: u32,
    /// Maximum number of detail requests in flight per search
    pub detail_concurrency: usize,
}

impl std::fmt::Debug for SpoonacularConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpoonacularConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("search_count", &self.search_count)
            .field("detail_concurrency", &self.detail_concurrency)
            .finish()
    }
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("RECIPE_BOX_DATABASE_URL")?;
        let host = get_parsed_or_default::<IpAddr>("RECIPE_BOX_HOST", "127.0.0.1")?;
        let port = get_parsed_or_default::<u16>("RECIPE_BOX_PORT", "3000")?;
        let base_url = get_required_env("RECIPE_BOX_BASE_URL")?;
        let session_secret = get_validated_secret("RECIPE_BOX_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "RECIPE_BOX_SESSION_SECRET")?;

        let spoonacular = SpoonacularConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            spoonacular,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_parsed_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: get_parsed_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl SpoonacularConfig {
    /// Load the Spoonacular section on its own.
    ///
    /// The CLI uses this to run searches without the web service settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the API key is missing or a numeric setting
    /// is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = get_required_secret("SPOONACULAR_API_KEY")?;
        let base_url = get_env_or_default("SPOONACULAR_BASE_URL", "https://api.spoonacular.com")
            .trim_end_matches('/')
            .to_string();
        let timeout_secs = get_parsed_or_default::<u64>("SPOONACULAR_TIMEOUT_SECS", "10")?;
        let search_count = get_parsed_or_default::<u32>("RECIPE_SEARCH_COUNT", "5")?;
        let detail_concurrency = get_parsed_or_default::<usize>("RECIPE_DETAIL_CONCURRENCY", "4")?;

        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SPOONACULAR_TIMEOUT_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        if search_count == 0 || search_count > MAX_SEARCH_COUNT {
            return Err(ConfigError::InvalidEnvVar(
                "RECIPE_SEARCH_COUNT".to_string(),
                format!("must be between 1 and {MAX_SEARCH_COUNT}"),
            ));
        }
        if detail_concurrency == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "RECIPE_DETAIL_CONCURRENCY".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            search_count,
            detail_concurrency,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable parsed into `T`, with a default value.
fn get_parsed_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
