use super::{Extractor, ParsingContext};
use crate::error::ImportError;
use crate::model::{RecipeRecord, Source};
use crate::normalize::{
    decode_html_symbols, format_time, join_lines, number_steps, resolve_author, AuthorValue,
};
use log::debug;
use scraper::Selector;
use serde::Deserialize;
use serde_json::Value;
use std::convert::TryFrom;

pub struct JsonLdExtractor;

impl JsonLdExtractor {
    fn convert_to_recipe(&self, json_ld_recipe: JsonLdRecipe) -> RecipeRecord {
        let mut record = RecipeRecord::new(Source::StructuredData);

        record.name = json_ld_recipe
            .name
            .map(|name| decode_html_symbols(&name.as_text()))
            .unwrap_or_default();

        record.description = json_ld_recipe
            .description
            .map(|desc| decode_html_symbols(&desc.as_text()))
            .unwrap_or_default();

        let ingredients = json_ld_recipe
            .recipe_ingredient
            .or(json_ld_recipe.ingredients)
            .map(|ingredients| ingredients.items())
            .unwrap_or_default();
        record.ingredients = join_lines(ingredients.iter().map(|ing| decode_html_symbols(ing)));

        let steps = json_ld_recipe
            .recipe_instructions
            .map(|instructions| instructions.steps())
            .unwrap_or_default();
        record.instructions = number_steps(steps.iter().map(|step| decode_html_symbols(step)));

        // cookTime wins over totalTime
        record.cook_time = [json_ld_recipe.cook_time, json_ld_recipe.total_time]
            .into_iter()
            .flatten()
            .map(|time| time.as_text())
            .find(|time| !time.trim().is_empty())
            .map(|time| format_time(&time))
            .unwrap_or_default();

        record.servings = [json_ld_recipe.recipe_yield, json_ld_recipe.yield_value]
            .into_iter()
            .flatten()
            .map(|servings| servings.as_text().trim().to_string())
            .find(|servings| !servings.is_empty())
            .unwrap_or_default();

        record.author = json_ld_recipe
            .author
            .map(|author| resolve_author(&author))
            .unwrap_or_default();

        record
    }
}

#[derive(Debug, Deserialize)]
struct JsonLdRecipe {
    #[serde(default)]
    name: Option<TextValue>,
    #[serde(default)]
    description: Option<TextValue>,
    #[serde(default, rename = "recipeIngredient")]
    recipe_ingredient: Option<TextValue>,
    // pre-2015 schema.org name for recipeIngredient
    #[serde(default)]
    ingredients: Option<TextValue>,
    #[serde(default, rename = "recipeInstructions")]
    recipe_instructions: Option<RecipeInstructions>,
    #[serde(default, rename = "cookTime")]
    cook_time: Option<TextValue>,
    #[serde(default, rename = "totalTime")]
    total_time: Option<TextValue>,
    #[serde(default, rename = "recipeYield")]
    recipe_yield: Option<TextValue>,
    #[serde(default, rename = "yield")]
    yield_value: Option<TextValue>,
    #[serde(default)]
    author: Option<AuthorValue>,
}

/// Loosely typed text: a string, a number, a `{text}`/`{name}` object, or a
/// list of those.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextValue {
    String(String),
    Number(serde_json::Number),
    Object {
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
    Multiple(Vec<TextValue>),
    Other(Value),
}

impl TextValue {
    /// First non-empty text.
    fn as_text(&self) -> String {
        self.lines().into_iter().next().unwrap_or_default()
    }

    /// Every non-empty text in order.
    fn lines(&self) -> Vec<String> {
        match self {
            TextValue::String(s) => non_empty(s),
            TextValue::Number(n) => vec![n.to_string()],
            TextValue::Object { text, name } => text
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .or(name.as_deref())
                .map(non_empty)
                .unwrap_or_default(),
            TextValue::Multiple(values) => values.iter().flat_map(TextValue::lines).collect(),
            TextValue::Other(_) => Vec::new(),
        }
    }

    /// Like [`TextValue::lines`], but a single string holding a whole list
    /// is split on its line breaks.
    fn items(&self) -> Vec<String> {
        match self {
            TextValue::String(s) => split_lines(s),
            TextValue::Multiple(values) => values.iter().flat_map(TextValue::items).collect(),
            other => other.lines(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeInstructions {
    String(String),
    Multiple(Vec<InstructionItem>),
    Single(InstructionItem),
}

/// A `HowToStep`, a `HowToSection` (steps under `itemListElement`), a bare
/// string, or a nested list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstructionItem {
    String(String),
    Step {
        #[serde(default)]
        text: Option<TextValue>,
        #[serde(default)]
        name: Option<TextValue>,
        #[serde(default, rename = "itemListElement")]
        item_list_element: Option<Vec<InstructionItem>>,
    },
    Nested(Vec<InstructionItem>),
    Other(Value),
}

impl RecipeInstructions {
    fn steps(&self) -> Vec<String> {
        match self {
            // a single block of text: one step per line
            RecipeInstructions::String(text) => split_lines(text),
            RecipeInstructions::Multiple(items) => {
                items.iter().flat_map(InstructionItem::steps).collect()
            }
            RecipeInstructions::Single(item) => item.steps(),
        }
    }
}

impl InstructionItem {
    fn steps(&self) -> Vec<String> {
        match self {
            InstructionItem::String(text) => non_empty(text),
            InstructionItem::Step {
                item_list_element: Some(children),
                ..
            } => children.iter().flat_map(InstructionItem::steps).collect(),
            // Prefer text over name
            InstructionItem::Step { text, name, .. } => [text, name]
                .into_iter()
                .flatten()
                .map(TextValue::as_text)
                .find(|step| !step.trim().is_empty())
                .into_iter()
                .collect(),
            InstructionItem::Nested(items) => {
                items.iter().flat_map(InstructionItem::steps).collect()
            }
            InstructionItem::Other(_) => Vec::new(),
        }
    }
}

impl TryFrom<&Value> for JsonLdRecipe {
    type Error = serde_json::Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value.clone())
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        Vec::new()
    } else {
        vec![text.to_string()]
    }
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(type_name)) => is_recipe_type_name(type_name),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(is_recipe_type_name),
        _ => false,
    }
}

/// Accepts "Recipe", "recipe", "schema:Recipe" and "https://schema.org/Recipe".
fn is_recipe_type_name(type_name: &str) -> bool {
    type_name
        .rsplit(['/', ':'])
        .next()
        .is_some_and(|name| name.trim().eq_ignore_ascii_case("recipe"))
}

/// Objects of a JSON-LD block in document order: array members, the root
/// object, then its `@graph` members.
fn candidates<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| candidates(item, out)),
        Value::Object(map) => {
            out.push(value);
            if let Some(graph) = map.get("@graph") {
                candidates(graph, out);
            }
        }
        _ => {}
    }
}

/// Strip HTML comment and CDATA wrappers some CMSes put around the JSON.
fn unwrap_script(raw: &str) -> &str {
    let mut json = raw.trim();
    for (open, close) in [("<!--", "-->"), ("//<![CDATA[", "//]]>"), ("<![CDATA[", "]]>")] {
        if let Some(inner) = json.strip_prefix(open).and_then(|r| r.strip_suffix(close)) {
            json = inner.trim();
        }
    }
    json
}

fn parse_block(raw: &str) -> Result<Value, ImportError> {
    Ok(serde_json::from_str(unwrap_script(raw))?)
}

impl Extractor for JsonLdExtractor {
    fn name(&self) -> &'static str {
        "json_ld"
    }

    fn extract(&self, context: &ParsingContext) -> Option<RecipeRecord> {
        debug!("JsonLdExtractor: Starting parse for URL: {}", context.url);
        let selector = Selector::parse("script[type='application/ld+json']").ok()?;

        let scripts: Vec<_> = context.document.select(&selector).collect();
        debug!(
            "JsonLdExtractor: Found {} JSON-LD script tags",
            scripts.len()
        );

        for (index, script) in scripts.iter().enumerate() {
            let raw_json = script.text().collect::<String>();
            let json_ld = match parse_block(&raw_json) {
                Ok(json_ld) => json_ld,
                Err(e) => {
                    debug!("JsonLdExtractor: Skipping script {}: {}", index, e);
                    continue;
                }
            };

            let mut objects = Vec::new();
            candidates(&json_ld, &mut objects);
            let Some(recipe) = objects.into_iter().find(|item| is_recipe_type(item)) else {
                debug!("JsonLdExtractor: No recipe found in script {}", index);
                continue;
            };

            match JsonLdRecipe::try_from(recipe) {
                Ok(recipe) => {
                    let record = self.convert_to_recipe(recipe);
                    if record.is_empty() {
                        debug!("JsonLdExtractor: Recipe in script {} has no usable fields", index);
                        return None;
                    }
                    debug!("JsonLdExtractor: Using recipe from script {}", index);
                    return Some(record);
                }
                Err(e) => {
                    debug!(
                        "JsonLdExtractor: Failed to convert script {}: {}",
                        index,
                        ImportError::from(e)
                    );
                }
            }
        }

        debug!("JsonLdExtractor: No valid recipe found in any JSON-LD script");
        None
    }
}
