use crate::model::RecipeRecord;
use crate::normalize::collapse_whitespace;
use scraper::{ElementRef, Html, Selector};

mod generic;
mod json_ld;
mod site_specific;

pub use generic::GenericHtmlExtractor;
pub use json_ld::JsonLdExtractor;
pub use site_specific::{SiteRule, SiteSpecificExtractor};

pub struct ParsingContext {
    pub url: String,
    /// Lowercased host of `url`, if it has one
    pub host: Option<String>,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: &str, html: &str) -> Self {
        let host = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase));
        Self {
            url: url.to_string(),
            host,
            document: Html::parse_document(html),
        }
    }
}

/// One extraction strategy. `None` means "no match", not an error.
pub trait Extractor {
    fn name(&self) -> &'static str;
    fn extract(&self, context: &ParsingContext) -> Option<RecipeRecord>;
}

/// Labels that section headings use inside ingredient/instruction lists.
const SECTION_HEADINGS: &[&str] = &[
    "ingredients",
    "ingredient",
    "directions",
    "direction",
    "instructions",
    "instruction",
    "method",
    "steps",
    "preparation",
];

/// Visible text of an element with whitespace collapsed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

pub(crate) fn is_section_heading(text: &str) -> bool {
    let label = text.trim().trim_end_matches(':').trim().to_lowercase();
    SECTION_HEADINGS.contains(&label.as_str())
}

/// Text of every element matching `selector` in DOM order, minus empty
/// strings and bare section headings.
pub(crate) fn collect_items(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(element_text)
        .filter(|text| !text.is_empty() && !is_section_heading(text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_host_is_lowercased() {
        let context = ParsingContext::new("https://WWW.Example.com/a", "<html></html>");
        assert_eq!(context.host.as_deref(), Some("www.example.com"));

        let context = ParsingContext::new("not a url", "<html></html>");
        assert!(context.host.is_none());
    }

    #[test]
    fn test_section_headings() {
        assert!(is_section_heading("Ingredients"));
        assert!(is_section_heading(" Directions: "));
        assert!(!is_section_heading("2 cups flour"));
    }

    #[test]
    fn test_collect_items_skips_headings() {
        let document = Html::parse_document(
            r#"<ul><li>Ingredients</li><li> 2  eggs </li><li></li><li>1 cup milk</li></ul>"#,
        );
        let selector = Selector::parse("li").unwrap();
        assert_eq!(collect_items(&document, &selector), vec!["2 eggs", "1 cup milk"]);
    }
}
