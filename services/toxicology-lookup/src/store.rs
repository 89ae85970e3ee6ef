//! Lookup Store
//!
//! Both lookup tables, loaded once at startup and shared read-only.

use toxref_models::{CrossReferenceIndex, IngredientIndex};
use toxref_utils::{SourcesConfig, ToxrefResult};
use tracing::info;

#[derive(Debug, Clone)]
pub struct Store {
    pub ingredients: IngredientIndex,
    pub cross_reference: CrossReferenceIndex,
}

impl Store {
    pub fn new(ingredients: IngredientIndex, cross_reference: CrossReferenceIndex) -> Self {
        Self {
            ingredients,
            cross_reference,
        }
    }

    pub fn load(sources: &SourcesConfig) -> ToxrefResult<Self> {
        let ingredients = IngredientIndex::load(&sources.ingredient_index_path)?;
        let cross_reference = CrossReferenceIndex::load(&sources.cross_reference_path)?;

        info!(
            ingredients = ingredients.len(),
            path = %sources.ingredient_index_path,
            cross_reference = %sources.cross_reference_path,
            "Lookup tables loaded"
        );

        Ok(Self::new(ingredients, cross_reference))
    }
}
