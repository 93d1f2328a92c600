use std::sync::Arc;
use std::time::Duration;

use crate::config::ImporterConfig;
use crate::model::{ImportResponse, RecipeRecord};
use crate::pipelines;
use crate::response;
use crate::url_to_recipe::fetchers::{Fetcher, RequestFetcher};
use crate::url_to_recipe::html::extractors::{SiteRule, SiteSpecificExtractor};
use crate::ImportError;
use log::warn;

const MIN_TIMEOUT: Duration = Duration::from_secs(8);
const MAX_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder for configuring a [`RecipeImporter`]
#[derive(Default)]
pub struct RecipeImporterBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
    sites: Vec<SiteRule>,
    fetcher: Option<Arc<dyn Fetcher>>,
}

impl RecipeImporterBuilder {
    /// Set a timeout for page fetches (defaults to 10 seconds)
    ///
    /// # Example
    /// ```
    /// use recipe_import::RecipeImporter;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .timeout(Duration::from_secs(8));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Override the `User-Agent` header sent to recipe sites
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Add a site rule; rules added here win over the built-in table
    ///
    /// # Example
    /// ```
    /// use recipe_import::{RecipeImporter, SiteRule};
    ///
    /// let builder = RecipeImporter::builder()
    ///     .site(SiteRule::new("example-recipes.com", ".ingredients li", ".steps li"));
    /// ```
    pub fn site(mut self, rule: SiteRule) -> Self {
        self.sites.push(rule);
        self
    }

    /// Use a custom page fetcher instead of the HTTP one
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Apply timeout, user agent and site rules from a loaded configuration
    pub fn config(self, config: &ImporterConfig) -> Self {
        let mut builder = self
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone());
        builder
            .sites
            .extend(config.sites.iter().cloned().map(SiteRule::from));
        builder
    }

    /// Build the importer
    ///
    /// # Errors
    /// Returns `ImportError` if the timeout is zero, the user agent is not a
    /// valid header value, or the HTTP client cannot be created.
    pub fn build(self) -> Result<RecipeImporter, ImportError> {
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ImportError::Builder(
                "Timeout must be greater than zero".to_string(),
            ));
        }

        if let Some(timeout) = self.timeout.filter(|t| !is_recommended_timeout(*t)) {
            warn!(
                "Fetch timeout of {:?} is outside the recommended {:?} to {:?}",
                timeout, MIN_TIMEOUT, MAX_TIMEOUT
            );
        }

        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(RequestFetcher::new(
                self.timeout,
                self.user_agent.as_deref(),
            )?),
        };

        Ok(RecipeImporter {
            fetcher,
            sites: SiteSpecificExtractor::with_rules(self.sites),
        })
    }
}

fn is_recommended_timeout(timeout: Duration) -> bool {
    (MIN_TIMEOUT..=MAX_TIMEOUT).contains(&timeout)
}

/// Imports recipes from URLs. Cheap to share between requests; it holds no
/// per-request state.
pub struct RecipeImporter {
    fetcher: Arc<dyn Fetcher>,
    sites: SiteSpecificExtractor,
}

impl RecipeImporter {
    /// Creates a new builder for importing recipes
    ///
    /// # Example
    /// ```
    /// use recipe_import::RecipeImporter;
    ///
    /// let importer = RecipeImporter::builder().build().unwrap();
    /// ```
    pub fn builder() -> RecipeImporterBuilder {
        RecipeImporterBuilder::default()
    }

    /// Fetch and extract, surfacing every failure as a typed error
    pub async fn fetch_recipe(&self, url: &str) -> Result<RecipeRecord, ImportError> {
        pipelines::url::process(self.fetcher.as_ref(), &self.sites, url).await
    }

    /// Fetch and extract, never failing: errors become a fallback record
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_import::RecipeImporter;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let importer = RecipeImporter::builder().build()?;
    /// let response = importer.import("https://example.com/recipe").await;
    /// println!("{} ({})", response.recipe.name, response.source.as_str());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn import(&self, url: &str) -> ImportResponse {
        response::build(url, self.fetch_recipe(url).await)
    }
}
