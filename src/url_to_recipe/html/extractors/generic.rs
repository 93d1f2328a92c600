use super::{collect_items, element_text, Extractor, ParsingContext};
use crate::model::{RecipeRecord, Source};
use crate::normalize::{
    collapse_whitespace, decode_html_symbols, extract_servings, format_time, join_lines,
    number_steps,
};
use log::debug;
use scraper::{ElementRef, Html, Selector};

/// Pulls a value out of a matched element.
type Reader = fn(ElementRef<'_>) -> String;

/// Selector tried for a field, with how to read the matched element.
struct Candidate {
    selector: &'static str,
    read: Reader,
}

const fn text(selector: &'static str) -> Candidate {
    Candidate {
        selector,
        read: read_text,
    }
}

const fn attr_or_text(selector: &'static str) -> Candidate {
    Candidate {
        selector,
        read: read_attr_or_text,
    }
}

const fn content(selector: &'static str) -> Candidate {
    Candidate {
        selector,
        read: read_content,
    }
}

fn read_text(element: ElementRef<'_>) -> String {
    element_text(element)
}

/// Microdata often carries the machine value in `content`/`datetime`.
fn read_attr_or_text(element: ElementRef<'_>) -> String {
    let value = element.value();
    value
        .attr("content")
        .or_else(|| value.attr("datetime"))
        .map(collapse_whitespace)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| element_text(element))
}

fn read_content(element: ElementRef<'_>) -> String {
    element
        .value()
        .attr("content")
        .map(collapse_whitespace)
        .unwrap_or_default()
}

const TITLE: &[Candidate] = &[
    text("[itemtype*='Recipe'] [itemprop='name']"),
    text(".wprm-recipe-name"),
    text(".tasty-recipes-title"),
    text(".recipe-title"),
    text(".recipe-name"),
    text("h1.entry-title"),
    text("h1"),
    content("meta[property='og:title']"),
    text("title"),
];

const MIN_DESCRIPTION_LEN: usize = 20;

const DESCRIPTION: &[Candidate] = &[
    attr_or_text("[itemtype*='Recipe'] [itemprop='description']"),
    text(".wprm-recipe-summary"),
    text(".tasty-recipes-description"),
    text(".recipe-summary"),
    text(".recipe-description"),
    content("meta[name='description']"),
    content("meta[property='og:description']"),
];

const INGREDIENTS: &[&str] = &[
    "[itemprop='recipeIngredient']",
    "[itemprop='ingredients']",
    ".wprm-recipe-ingredient",
    ".tasty-recipes-ingredients li",
    ".recipe-ingredients li",
    ".ingredients li",
    "#ingredients li",
    ".ingredient",
];

const INSTRUCTIONS: &[&str] = &[
    "[itemprop='recipeInstructions'] li",
    "[itemprop='recipeInstructions']",
    ".wprm-recipe-instruction-text",
    ".tasty-recipes-instructions li",
    ".recipe-instructions li",
    ".instructions li",
    ".directions li",
    "#instructions li",
    ".recipe-directions li",
    ".step",
];

const COOK_TIME: &[Candidate] = &[
    attr_or_text("[itemprop='cookTime']"),
    attr_or_text("[itemprop='totalTime']"),
    text(".wprm-recipe-cook_time"),
    text(".wprm-recipe-total_time"),
    text(".recipe-cook-time"),
    text(".cook-time"),
    text(".total-time"),
];

const SERVINGS: &[Candidate] = &[
    attr_or_text("[itemprop='recipeYield']"),
    text(".wprm-recipe-servings"),
    text(".tasty-recipes-yield"),
    text(".recipe-yield"),
    text(".servings"),
    text(".yield"),
];

const AUTHOR: &[Candidate] = &[
    attr_or_text("[itemprop='author'] [itemprop='name']"),
    attr_or_text("[itemprop='author']"),
    content("meta[name='author']"),
    text(".wprm-recipe-author"),
    text(".recipe-author"),
    text(".author-name"),
    text("[rel='author']"),
    text(".byline"),
];

/// First value, in candidate priority order, that satisfies `accept`.
/// Later candidates are never evaluated once one hits.
fn first_match(
    document: &Html,
    candidates: &[Candidate],
    accept: impl Fn(&str) -> bool,
) -> Option<String> {
    candidates.iter().find_map(|candidate| {
        let selector = Selector::parse(candidate.selector).ok()?;
        let value = document
            .select(&selector)
            .map(candidate.read)
            .find(|value| accept(value.as_str()))?;
        debug!("GenericHtmlExtractor: Matched {}", candidate.selector);
        Some(value)
    })
}

/// Items of the first selector that yields any, in DOM order.
fn first_list(document: &Html, selectors: &[&str]) -> Vec<String> {
    selectors
        .iter()
        .find_map(|selector| {
            let parsed = Selector::parse(selector).ok()?;
            let items = collect_items(document, &parsed);
            if items.is_empty() {
                None
            } else {
                debug!(
                    "GenericHtmlExtractor: Found {} items with {}",
                    items.len(),
                    selector
                );
                Some(items)
            }
        })
        .unwrap_or_default()
}

fn non_empty(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Field-by-field extraction from microdata attributes and common class names.
pub struct GenericHtmlExtractor;

impl Extractor for GenericHtmlExtractor {
    fn name(&self) -> &'static str {
        "generic_html"
    }

    fn extract(&self, context: &ParsingContext) -> Option<RecipeRecord> {
        debug!("GenericHtmlExtractor: Starting parse for URL: {}", context.url);
        let document = &context.document;
        let mut record = RecipeRecord::new(Source::HtmlParsing);

        record.name = first_match(document, TITLE, non_empty)
            .map(|title| decode_html_symbols(&title))
            .unwrap_or_default();

        record.description = first_match(document, DESCRIPTION, |desc| {
            desc.trim().chars().count() > MIN_DESCRIPTION_LEN
        })
        .unwrap_or_default();

        record.ingredients = join_lines(first_list(document, INGREDIENTS));
        record.instructions = number_steps(first_list(document, INSTRUCTIONS));

        record.cook_time = first_match(document, COOK_TIME, non_empty)
            .map(|time| format_time(&time))
            .unwrap_or_default();

        record.servings = first_match(document, SERVINGS, non_empty)
            .map(|servings| extract_servings(&servings))
            .unwrap_or_default();

        record.author = first_match(document, AUTHOR, non_empty).unwrap_or_default();

        if record.is_empty() {
            debug!("GenericHtmlExtractor: Nothing found");
            None
        } else {
            Some(record)
        }
    }
}
