//! Ingredient search with per-recipe enrichment.
//!
//! A search is one `findByIngredients` call followed by one
//! `/recipes/{id}/information` call per hit. Detail calls run with bounded
//! concurrency and results keep the search order. A failed detail call does
//! not fail the search: the recipe is returned with only its search fields
//! and its id is listed in [`RecipeSearch::failed_enrichments`].

use futures::{StreamExt, stream};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use recipe_box_core::{Recipe, RecipeId};

use crate::config::MAX_SEARCH_COUNT;
use crate::spoonacular::{RecipeInformation, RecipeProvider, SearchHit, SpoonacularError};

/// Default number of recipes per search.
pub const DEFAULT_SEARCH_COUNT: u32 = 5;

/// Errors from an ingredient search.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The ingredient list was empty after normalisation.
    #[error("enter at least one ingredient")]
    NoIngredients,

    /// Requested recipe count is out of range.
    #[error("number of recipes must be between 1 and {max}")]
    InvalidCount { max: u32 },

    /// The search call itself failed.
    #[error("recipe service unavailable: {0}")]
    UpstreamUnavailable(#[source] SpoonacularError),
}

/// Result of a search.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecipeSearch {
    /// Recipes in search order.
    pub recipes: Vec<Recipe>,
    /// Ids of recipes whose detail call failed.
    pub failed_enrichments: Vec<RecipeId>,
}

impl RecipeSearch {
    /// Whether the provider found no matching recipes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

/// Split a comma-separated ingredient list, trimming entries and dropping
/// empty ones.
#[must_use]
pub fn normalize_ingredients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Recipe search over a [`RecipeProvider`].
pub struct RecipeGateway<'a, P> {
    provider: &'a P,
    detail_concurrency: usize,
}

impl<'a, P: RecipeProvider> RecipeGateway<'a, P> {
    /// Create a gateway. `detail_concurrency` is clamped to at least 1.
    #[must_use]
    pub fn new(provider: &'a P, detail_concurrency: usize) -> Self {
        Self {
            provider,
            detail_concurrency: detail_concurrency.max(1),
        }
    }

    /// Find up to `count` recipes using the comma-separated `ingredients_csv`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NoIngredients` or `GatewayError::InvalidCount`
    /// for bad input (nothing is sent upstream), and
    /// `GatewayError::UpstreamUnavailable` if the search call fails.
    #[instrument(skip(self))]
    pub async fn find_recipes_by_ingredients(
        &self,
        ingredients_csv: &str,
        count: u32,
    ) -> Result<RecipeSearch, GatewayError> {
        let ingredients = normalize_ingredients(ingredients_csv);
        if ingredients.is_empty() {
            return Err(GatewayError::NoIngredients);
        }
        if count == 0 || count > MAX_SEARCH_COUNT {
            return Err(GatewayError::InvalidCount {
                max: MAX_SEARCH_COUNT,
            });
        }

        let mut hits = self
            .provider
            .search_by_ingredients(&ingredients, count)
            .await
            .map_err(|e| {
                warn!(error = %e, "Recipe search failed");
                GatewayError::UpstreamUnavailable(e)
            })?;
        hits.truncate(usize::try_from(count).unwrap_or(usize::MAX));

        let provider = self.provider;
        let details: Vec<(SearchHit, Result<RecipeInformation, SpoonacularError>)> =
            stream::iter(hits)
                .map(|hit| async move {
                    let detail = provider.recipe_information(hit.id).await;
                    (hit, detail)
                })
                .buffered(self.detail_concurrency)
                .collect()
                .await;

        let mut search = RecipeSearch::default();
        for (hit, detail) in details {
            let mut recipe = Recipe::from_search(hit.id, hit.title);
            recipe.thumbnail = hit.image;
            recipe.used_ingredient_count = hit.used_ingredient_count;
            recipe.missed_ingredient_count = hit.missed_ingredient_count;

            match detail {
                Ok(info) => {
                    recipe.ingredients = info.ingredients();
                    recipe.steps = info.first_block_steps();
                    recipe.image = info.image.unwrap_or_default();
                }
                Err(e) => {
                    warn!(recipe_id = %recipe.id, error = %e, "Failed to fetch recipe details");
                    search.failed_enrichments.push(recipe.id);
                }
            }
            search.recipes.push(recipe);
        }

        info!(
            recipes = search.recipes.len(),
            failed_enrichments = search.failed_enrichments.len(),
            "Recipe search complete"
        );

        Ok(search)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::spoonacular::types::{ExtendedIngredient, InstructionBlock, InstructionStep};

    /// Scripted provider. Detail calls for ids in `failing` time out.
    #[derive(Default)]
    pub struct FakeProvider {
        pub hits: Vec<SearchHit>,
        pub details: HashMap<RecipeId, RecipeInformation>,
        pub failing: Vec<RecipeId>,
        pub search_fails: bool,
        pub searches: Mutex<Vec<(Vec<String>, u32)>>,
        pub detail_calls: Mutex<Vec<RecipeId>>,
    }

    impl FakeProvider {
        pub fn with_hits(ids: &[i32]) -> Self {
            let hits = ids
                .iter()
                .map(|&id| SearchHit {
                    id: RecipeId::new(id),
                    title: format!("Recipe {id}"),
                    image: Some(format!("https://img.example/{id}-312x231.jpg")),
                    used_ingredient_count: 1,
                    missed_ingredient_count: 2,
                })
                .collect();
            let details = ids
                .iter()
                .map(|&id| (RecipeId::new(id), detail_for(id)))
                .collect();
            Self {
                hits,
                details,
                ..Self::default()
            }
        }
    }

    pub fn detail_for(id: i32) -> RecipeInformation {
        RecipeInformation {
            image: Some(format!("https://img.example/{id}-556x370.jpg")),
            extended_ingredients: vec![ExtendedIngredient {
                id: Some(9003),
                name: "apple".to_string(),
                amount: 2.0,
                unit: String::new(),
                original: "2 apples".to_string(),
            }],
            analyzed_instructions: vec![InstructionBlock {
                steps: vec![
                    InstructionStep {
                        step: "Peel.".to_string(),
                    },
                    InstructionStep {
                        step: "Bake.".to_string(),
                    },
                ],
            }],
        }
    }

    impl RecipeProvider for FakeProvider {
        async fn search_by_ingredients(
            &self,
            ingredients: &[String],
            count: u32,
        ) -> Result<Vec<SearchHit>, SpoonacularError> {
            self.searches
                .lock()
                .unwrap()
                .push((ingredients.to_vec(), count));
            if self.search_fails {
                return Err(SpoonacularError::Status {
                    status: 402,
                    message: "daily quota used up".to_string(),
                });
            }
            Ok(self.hits.clone())
        }

        async fn recipe_information(
            &self,
            id: RecipeId,
        ) -> Result<RecipeInformation, SpoonacularError> {
            self.detail_calls.lock().unwrap().push(id);
            if self.failing.contains(&id) {
                return Err(SpoonacularError::Timeout);
            }
            self.details
                .get(&id)
                .cloned()
                .ok_or(SpoonacularError::Status {
                    status: 404,
                    message: "not found".to_string(),
                })
        }
    }

    #[test]
    fn test_normalize_ingredients() {
        assert_eq!(
            normalize_ingredients(" apple, flour ,,sugar , "),
            vec!["apple", "flour", "sugar"]
        );
        assert!(normalize_ingredients(" , ,").is_empty());
    }

    #[tokio::test]
    async fn test_apple_flour_with_one_detail_timeout() {
        let mut provider = FakeProvider::with_hits(&[1, 2]);
        provider.failing.push(RecipeId::new(2));
        let gateway = RecipeGateway::new(&provider, 4);

        let search = gateway
            .find_recipes_by_ingredients("apple,flour", DEFAULT_SEARCH_COUNT)
            .await
            .unwrap();

        assert_eq!(
            provider.searches.lock().unwrap()[0],
            (vec!["apple".to_string(), "flour".to_string()], 5)
        );
        assert_eq!(search.recipes.len(), 2);
        assert_eq!(search.recipes[0].id, RecipeId::new(1));
        assert_eq!(search.recipes[0].steps, vec!["Peel.", "Bake."]);
        assert_eq!(search.recipes[0].image, "https://img.example/1-556x370.jpg");
        assert_eq!(search.recipes[0].ingredients.len(), 1);

        let second = &search.recipes[1];
        assert_eq!(second.id, RecipeId::new(2));
        assert!(second.steps.is_empty());
        assert!(second.ingredients.is_empty());
        assert_eq!(second.image, "");
        assert_eq!(search.failed_enrichments, vec![RecipeId::new(2)]);
    }

    #[tokio::test]
    async fn test_truncates_to_count_and_keeps_order() {
        let provider = FakeProvider::with_hits(&[10, 20, 30, 40, 50, 60, 70]);
        let gateway = RecipeGateway::new(&provider, 2);

        let search = gateway
            .find_recipes_by_ingredients("egg", DEFAULT_SEARCH_COUNT)
            .await
            .unwrap();

        let ids: Vec<i32> = search.recipes.iter().map(|r| r.id.as_i32()).collect();
        assert_eq!(ids, vec![10, 20, 30, 40, 50]);
        assert_eq!(provider.detail_calls.lock().unwrap().len(), 5);
        assert!(search.failed_enrichments.is_empty());
    }

    #[tokio::test]
    async fn test_fewer_hits_than_count() {
        let provider = FakeProvider::with_hits(&[3]);
        let gateway = RecipeGateway::new(&provider, 4);

        let search = gateway.find_recipes_by_ingredients("rice", 5).await.unwrap();
        assert_eq!(search.recipes.len(), 1);
        assert_eq!(provider.detail_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_matches_is_ok_and_empty() {
        let provider = FakeProvider::default();
        let gateway = RecipeGateway::new(&provider, 4);

        let search = gateway
            .find_recipes_by_ingredients("dragonfruit", 5)
            .await
            .unwrap();
        assert!(search.is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_is_upstream_unavailable() {
        let provider = FakeProvider {
            search_fails: true,
            ..FakeProvider::default()
        };
        let gateway = RecipeGateway::new(&provider, 4);

        let result = gateway.find_recipes_by_ingredients("apple", 5).await;
        assert!(matches!(result, Err(GatewayError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_empty_ingredients_never_sent_upstream() {
        let provider = FakeProvider::with_hits(&[1]);
        let gateway = RecipeGateway::new(&provider, 4);

        let result = gateway.find_recipes_by_ingredients(" , ", 5).await;
        assert!(matches!(result, Err(GatewayError::NoIngredients)));
        assert!(provider.searches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_count_out_of_range() {
        let provider = FakeProvider::with_hits(&[1]);
        let gateway = RecipeGateway::new(&provider, 4);

        assert!(matches!(
            gateway.find_recipes_by_ingredients("apple", 0).await,
            Err(GatewayError::InvalidCount { .. })
        ));
        assert!(matches!(
            gateway.find_recipes_by_ingredients("apple", 101).await,
            Err(GatewayError::InvalidCount { max: 100 })
        ));
    }
}
