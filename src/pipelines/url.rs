use crate::error::ImportError;
use crate::model::{RecipeRecord, Source};
use crate::normalize::get_site_name;
use crate::url_to_recipe::fetchers::{parse_url, Fetcher};
use crate::url_to_recipe::html::extractors::{
    Extractor, GenericHtmlExtractor, JsonLdExtractor, ParsingContext, SiteSpecificExtractor,
};
use log::{debug, info};

/// Fetch a page and extract a recipe from it.
///
/// Any failure is returned as-is; turning it into a fallback record is the
/// caller's job (see [`crate::response`]).
pub async fn process(
    fetcher: &dyn Fetcher,
    sites: &SiteSpecificExtractor,
    url: &str,
) -> Result<RecipeRecord, ImportError> {
    // 1. Validate before any network traffic
    let parsed = parse_url(url)?;

    // 2. Fetch HTML
    let html = fetcher.fetch(&parsed).await?;
    debug!("Fetched {} bytes from {}", html.len(), parsed);

    // 3. Extract (sync; the parsed document never crosses an await)
    extract_with_sites(url, &html, sites)
}

/// Run the extraction strategies over already-fetched HTML using the
/// built-in site table.
pub fn extract_recipe(url: &str, html: &str) -> Result<RecipeRecord, ImportError> {
    extract_with_sites(url, html, &SiteSpecificExtractor::default())
}

/// Structured data first, then generic HTML. The site table fills in what
/// either left missing, and on a known site it can supply the whole record.
pub fn extract_with_sites(
    url: &str,
    html: &str,
    sites: &SiteSpecificExtractor,
) -> Result<RecipeRecord, ImportError> {
    let context = ParsingContext::new(url, html);

    let extractors: [&dyn Extractor; 2] = [&JsonLdExtractor, &GenericHtmlExtractor];

    let mut record = extractors
        .iter()
        .find_map(|extractor| {
            let record = extractor.extract(&context)?;
            info!("Recipe extracted from {} using {}", url, extractor.name());
            Some(record)
        })
        .unwrap_or_else(|| RecipeRecord::new(Source::HtmlParsing));

    if sites.backfill(&context, &mut record) {
        info!("Backfilled recipe content from site rules for {}", url);
    }

    if record.is_empty() {
        return Err(ImportError::ExtractionFailure);
    }

    finalize(url, &mut record);
    Ok(record)
}

fn finalize(url: &str, record: &mut RecipeRecord) {
    record.site_name = get_site_name(url);
    if record.name.trim().is_empty() {
        record.name = format!("Recipe from {}", record.site_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;

    struct StaticFetcher {
        body: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, _url: &Url) -> Result<String, ImportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.to_string())
        }
    }

    #[tokio::test]
    async fn test_invalid_url_never_fetches() {
        let fetcher = StaticFetcher {
            body: "<html></html>",
            calls: AtomicUsize::new(0),
        };
        let result = process(&fetcher, &SiteSpecificExtractor::default(), "nope").await;

        assert!(matches!(result, Err(ImportError::InvalidInput(_))));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_process_uses_fetched_html() {
        let fetcher = StaticFetcher {
            body: r#"<html><body><h1>Tomato Soup</h1><ul class="ingredients"><li>4 tomatoes</li></ul></body></html>"#,
            calls: AtomicUsize::new(0),
        };
        let record = process(
            &fetcher,
            &SiteSpecificExtractor::default(),
            "https://www.soups.example/tomato",
        )
        .await
        .unwrap();

        assert_eq!(record.source, Source::HtmlParsing);
        assert_eq!(record.name, "Tomato Soup");
        assert_eq!(record.ingredients, "4 tomatoes");
        assert_eq!(record.site_name, "soups.example");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_name_synthesized_from_site() {
        let html = r#"<html><body><ul class="ingredients"><li>1 cup rice</li></ul></body></html>"#;
        let record = extract_recipe("https://www.ricecooker.example/plain", html).unwrap();
        assert_eq!(record.name, "Recipe from ricecooker.example");
    }

    #[test]
    fn test_site_rule_alone_extracts() {
        let html = r#"<html><body>
            <ul class="recipe__ingredients"><li>200g spaghetti</li><li>2 eggs</li></ul>
            <ol class="recipe__method-steps"><li>Boil the pasta.</li><li>Stir in the eggs.</li></ol>
        </body></html>"#;
        let record = extract_recipe("https://www.bbcgoodfood.com/recipes/carbonara", html).unwrap();

        assert_eq!(record.source, Source::HtmlParsing);
        assert_eq!(record.ingredients, "200g spaghetti\n2 eggs");
        assert_eq!(record.name, "Recipe from BBC Good Food");
    }

    #[test]
    fn test_nothing_extractable_is_failure() {
        let result = extract_recipe("https://example.com", "<html><body></body></html>");
        assert!(matches!(result, Err(ImportError::ExtractionFailure)));
    }
}
