use crate::error::ImportError;
use crate::model::{ImportResponse, RecipeRecord, Source};
use crate::normalize::get_site_name;
use log::warn;

pub const INGREDIENTS_PLACEHOLDER: &str =
    "Could not extract ingredients automatically. Please add the ingredients manually.";
pub const INSTRUCTIONS_PLACEHOLDER: &str =
    "Could not extract instructions automatically. Please add the instructions manually.";

/// Envelope for a successfully extracted record.
pub fn success(recipe: RecipeRecord) -> ImportResponse {
    ImportResponse {
        success: true,
        source: recipe.source,
        recipe,
        message: None,
    }
}

/// Envelope with a manual-entry placeholder record. Still `success: true`:
/// the caller always gets a usable record and checks `source`.
pub fn fallback(url: &str, error: &ImportError) -> ImportResponse {
    let site_name = get_site_name(url);
    let mut recipe = RecipeRecord::new(Source::Fallback);
    recipe.name = format!("Recipe from {site_name}");
    recipe.ingredients = INGREDIENTS_PLACEHOLDER.to_string();
    recipe.instructions = INSTRUCTIONS_PLACEHOLDER.to_string();
    recipe.site_name = site_name;

    ImportResponse {
        success: true,
        source: Source::Fallback,
        recipe,
        message: Some(format!(
            "Could not import the recipe automatically ({error}). Please enter the details manually."
        )),
    }
}

/// Turn the pipeline outcome into the response the caller sees.
pub fn build(url: &str, result: Result<RecipeRecord, ImportError>) -> ImportResponse {
    match result {
        Ok(recipe) => success(recipe),
        Err(e) => {
            warn!("Falling back to manual entry for {}: {}", url, e);
            fallback(url, &e)
        }
    }
}
