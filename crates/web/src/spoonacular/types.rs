//! Wire types for the Spoonacular JSON API.
//!
//! Only the fields the service reads are modelled; everything else in the
//! payload is ignored.

use serde::Deserialize;

use recipe_box_core::{Ingredient, RecipeId};

/// One entry of a `findByIngredients` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: RecipeId,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub used_ingredient_count: u32,
    #[serde(default)]
    pub missed_ingredient_count: u32,
}

/// The subset of a `/recipes/{id}/information` response we use.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInformation {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub extended_ingredients: Vec<ExtendedIngredient>,
    #[serde(default)]
    pub analyzed_instructions: Vec<InstructionBlock>,
}

impl RecipeInformation {
    /// Step texts of the first instruction block, in order.
    #[must_use]
    pub fn first_block_steps(&self) -> Vec<String> {
        self.analyzed_instructions
            .first()
            .map(|block| block.steps.iter().map(|s| s.step.clone()).collect())
            .unwrap_or_default()
    }

    /// Ingredients converted to the domain type.
    #[must_use]
    pub fn ingredients(&self) -> Vec<Ingredient> {
        self.extended_ingredients
            .iter()
            .cloned()
            .map(Ingredient::from)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedIngredient {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub original: String,
}

impl From<ExtendedIngredient> for Ingredient {
    fn from(wire: ExtendedIngredient) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            amount: wire.amount,
            unit: wire.unit,
            original: wire.original,
        }
    }
}

/// Only the step text is read; block names and step numbers are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct InstructionBlock {
    #[serde(default)]
    pub steps: Vec<InstructionStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstructionStep {
    pub step: String,
}
