pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod pipelines;
pub mod response;
pub mod server;
pub mod url_to_recipe;

pub use builder::{RecipeImporter, RecipeImporterBuilder};
pub use config::ImporterConfig;
pub use error::ImportError;
pub use model::{ImportResponse, RecipeRecord, Source};
pub use pipelines::url::extract_recipe;
pub use url_to_recipe::html::extractors::SiteRule;

/// Import a recipe with default settings. Never fails; see
/// [`RecipeImporter::import`].
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() {
/// let response = recipe_import::import_recipe("https://example.com/recipe").await;
/// assert!(response.success);
/// # }
/// ```
pub async fn import_recipe(url: &str) -> ImportResponse {
    match RecipeImporter::builder().build() {
        Ok(importer) => importer.import(url).await,
        Err(e) => response::fallback(url, &e),
    }
}
