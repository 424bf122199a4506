//! Spoonacular HTTP client implementation.
//!
//! Uses `reqwest` 0.13 with a per-request timeout taken from configuration.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use recipe_box_core::RecipeId;

use super::types::{RecipeInformation, SearchHit};
use super::{RecipeProvider, SpoonacularError};
use crate::config::SpoonacularConfig;

/// Client for the Spoonacular recipe API.
#[derive(Clone)]
pub struct SpoonacularClient {
    inner: Arc<SpoonacularClientInner>,
}

struct SpoonacularClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl SpoonacularClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `SpoonacularError::InvalidUrl` if the base URL does not parse,
    /// or `SpoonacularError::Http` if the HTTP client cannot be built.
    pub fn new(config: &SpoonacularConfig) -> Result<Self, SpoonacularError> {
        let base_url = config.base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url).map_err(|e| SpoonacularError::InvalidUrl(e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(SpoonacularClientInner {
                client,
                base_url,
                api_key: config.api_key.clone(),
            }),
        })
    }

    /// Build an endpoint URL with the API key attached.
    fn endpoint(&self, path: &str) -> Result<Url, SpoonacularError> {
        let mut url = Url::parse(&format!("{}{path}", self.inner.base_url))
            .map_err(|e| SpoonacularError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("apiKey", self.inner.api_key.expose_secret());
        Ok(url)
    }

    /// Issue a GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, SpoonacularError> {
        let response = self.inner.client.get(url).send().await.map_err(map_send_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_send_error)?;

        if !status.is_success() {
            warn!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "Spoonacular returned non-success status"
            );
            return Err(SpoonacularError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

fn map_send_error(err: reqwest::Error) -> SpoonacularError {
    if err.is_timeout() {
        SpoonacularError::Timeout
    } else {
        SpoonacularError::Http(err)
    }
}

impl RecipeProvider for SpoonacularClient {
    #[instrument(skip(self), fields(ingredient_count = ingredients.len()))]
    async fn search_by_ingredients(
        &self,
        ingredients: &[String],
        count: u32,
    ) -> Result<Vec<SearchHit>, SpoonacularError> {
        let mut url = self.endpoint("/recipes/findByIngredients")?;
        url.query_pairs_mut()
            .append_pair("ingredients", &ingredients.join(","))
            .append_pair("number", &count.to_string());

        let hits: Vec<SearchHit> = self.get_json(url).await?;
        debug!(hits = hits.len(), "Spoonacular search complete");
        Ok(hits)
    }

    #[instrument(skip(self), fields(recipe_id = %id))]
    async fn recipe_information(&self, id: RecipeId) -> Result<RecipeInformation, SpoonacularError> {
        let url = self.endpoint(&format!("/recipes/{id}/information"))?;
        self.get_json(url).await
    }
}
