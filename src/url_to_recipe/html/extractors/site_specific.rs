use super::{collect_items, ParsingContext};
use crate::config::SiteRuleConfig;
use crate::model::RecipeRecord;
use crate::normalize::{join_lines, number_steps};
use log::{debug, warn};
use scraper::Selector;

/// Ingredient/instruction text shorter than this is treated as missing.
pub const MIN_CONTENT_LEN: usize = 15;

/// Selectors for one recipe site, matched by host substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRule {
    pub host: String,
    pub ingredients: String,
    pub instructions: String,
}

impl SiteRule {
    pub fn new(
        host: impl Into<String>,
        ingredients: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            ingredients: ingredients.into(),
            instructions: instructions.into(),
        }
    }
}

impl From<SiteRuleConfig> for SiteRule {
    fn from(config: SiteRuleConfig) -> Self {
        Self::new(config.host, config.ingredients, config.instructions)
    }
}

const BUILTIN_RULES: &[(&str, &str, &str)] = &[
    (
        "allrecipes.com",
        ".mm-recipes-structured-ingredients__list-item, .ingredients-item-name",
        ".mm-recipes-steps__content li p, .instructions-section-item .paragraph",
    ),
    (
        "foodnetwork.com",
        ".o-Ingredients__a-Ingredient--CheckboxLabel",
        ".o-Method__m-Step",
    ),
    (
        "seriouseats.com",
        ".structured-ingredients__list-item",
        ".structured-project__steps li p",
    ),
    (
        "simplyrecipes.com",
        ".structured-ingredients__list-item",
        ".structured-project__steps li p",
    ),
    (
        "bbcgoodfood.com",
        ".recipe__ingredients li",
        ".recipe__method-steps li",
    ),
    (
        "bonappetit.com",
        "[data-testid='IngredientList'] p, [data-testid='IngredientList'] div div",
        "[data-testid='InstructionsWrapper'] li p",
    ),
    (
        "epicurious.com",
        "[data-testid='IngredientList'] p, [data-testid='IngredientList'] div div",
        "[data-testid='InstructionsWrapper'] li p",
    ),
    (
        "cooking.nytimes.com",
        "[class*='ingredient_ingredient']",
        "[class*='preparation_step'] p",
    ),
    ("tasty.co", ".ingredients__section li", ".preparation li"),
    ("delish.com", ".ingredient-lists li", ".directions li"),
];

/// Per-domain selector table used to backfill ingredients and instructions.
pub struct SiteSpecificExtractor {
    rules: Vec<SiteRule>,
}

impl Default for SiteSpecificExtractor {
    fn default() -> Self {
        Self {
            rules: BUILTIN_RULES
                .iter()
                .map(|(host, ingredients, instructions)| {
                    SiteRule::new(*host, *ingredients, *instructions)
                })
                .collect(),
        }
    }
}

impl SiteSpecificExtractor {
    /// Built-in table with `extra` rules taking precedence.
    pub fn with_rules(extra: impl IntoIterator<Item = SiteRule>) -> Self {
        let mut rules: Vec<SiteRule> = extra.into_iter().collect();
        rules.extend(Self::default().rules);
        Self { rules }
    }

    pub fn rule_for(&self, host: &str) -> Option<&SiteRule> {
        let host = host.to_lowercase();
        self.rules
            .iter()
            .find(|rule| host.contains(&rule.host.to_lowercase()))
    }

    /// Fill `ingredients`/`instructions` from the site table when they are
    /// missing or implausibly short. No host match is a no-op.
    ///
    /// Returns true when any field was replaced.
    pub fn backfill(&self, context: &ParsingContext, record: &mut RecipeRecord) -> bool {
        let Some(rule) = context.host.as_deref().and_then(|host| self.rule_for(host)) else {
            return false;
        };
        debug!("SiteSpecificExtractor: Using rule for {}", rule.host);

        let mut changed = false;
        if is_missing(&record.ingredients) {
            let items = self.select(context, &rule.ingredients);
            if !items.is_empty() {
                record.ingredients = join_lines(items);
                changed = true;
            }
        }
        if is_missing(&record.instructions) {
            let items = self.select(context, &rule.instructions);
            if !items.is_empty() {
                record.instructions = number_steps(items);
                changed = true;
            }
        }
        changed
    }

    fn select(&self, context: &ParsingContext, selector: &str) -> Vec<String> {
        match Selector::parse(selector) {
            Ok(selector) => collect_items(&context.document, &selector),
            Err(e) => {
                warn!("SiteSpecificExtractor: Invalid selector '{}': {}", selector, e);
                Vec::new()
            }
        }
    }
}

fn is_missing(text: &str) -> bool {
    text.trim().chars().count() < MIN_CONTENT_LEN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Source;

    const BBC_PAGE: &str = r#"
        <html><body>
            <section class="recipe__ingredients">
                <h2>Ingredients</h2>
                <ul>
                    <li>Ingredients</li>
                    <li>500g beef mince</li>
                    <li>2 onions, chopped</li>
                </ul>
            </section>
            <section class="recipe__method-steps">
                <ol>
                    <li>Brown the mince.</li>
                    <li>Add the onions and simmer.</li>
                </ol>
            </section>
        </body></html>
    "#;

    #[test]
    fn test_rule_lookup_by_host_substring() {
        let sites = SiteSpecificExtractor::default();
        assert_eq!(
            sites.rule_for("www.bbcgoodfood.com").map(|r| r.host.as_str()),
            Some("bbcgoodfood.com")
        );
        assert!(sites.rule_for("example.com").is_none());
    }

    #[test]
    fn test_backfill_missing_fields() {
        let context = ParsingContext::new("https://www.bbcgoodfood.com/recipes/cottage-pie", BBC_PAGE);
        let mut record = RecipeRecord::new(Source::HtmlParsing);
        record.ingredients = "beef".to_string();

        assert!(SiteSpecificExtractor::default().backfill(&context, &mut record));
        assert_eq!(record.ingredients, "500g beef mince\n2 onions, chopped");
        assert_eq!(
            record.instructions,
            "1. Brown the mince.\n\n2. Add the onions and simmer."
        );
    }

    #[test]
    fn test_backfill_keeps_plausible_fields() {
        let context = ParsingContext::new("https://www.bbcgoodfood.com/recipes/cottage-pie", BBC_PAGE);
        let mut record = RecipeRecord::new(Source::StructuredData);
        record.ingredients = "1kg potatoes\n500g beef mince".to_string();
        record.instructions = "1. Boil the potatoes until soft.".to_string();

        assert!(!SiteSpecificExtractor::default().backfill(&context, &mut record));
        assert_eq!(record.ingredients, "1kg potatoes\n500g beef mince");
    }

    #[test]
    fn test_unknown_host_is_noop() {
        let context = ParsingContext::new("https://example.com/pie", BBC_PAGE);
        let mut record = RecipeRecord::new(Source::HtmlParsing);
        assert!(!SiteSpecificExtractor::default().backfill(&context, &mut record));
        assert!(record.ingredients.is_empty());
    }

    #[test]
    fn test_extra_rules_take_precedence() {
        let sites = SiteSpecificExtractor::with_rules([SiteRule::new(
            "bbcgoodfood.com",
            ".custom li",
            ".custom-steps li",
        )]);
        assert_eq!(
            sites.rule_for("bbcgoodfood.com").map(|r| r.ingredients.as_str()),
            Some(".custom li")
        );
    }

    #[test]
    fn test_invalid_selector_is_ignored() {
        let sites = SiteSpecificExtractor::with_rules([SiteRule::new("example.com", "[[", "li")]);
        let context = ParsingContext::new("https://example.com/pie", "<ol><li>Bake it all.</li></ol>");
        let mut record = RecipeRecord::new(Source::HtmlParsing);

        assert!(sites.backfill(&context, &mut record));
        assert!(record.ingredients.is_empty());
        assert_eq!(record.instructions, "1. Bake it all.");
    }
}
