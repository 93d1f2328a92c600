//! Pure post-processing helpers shared by every extractor.

use html_escape::decode_html_entities;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use url::Url;

static HOURS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)H").expect("Invalid hours regex"));
static MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)M").expect("Invalid minutes regex"));
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid number regex"));

/// Returned by [`get_site_name`] when the URL cannot be parsed.
pub const UNKNOWN_SITE: &str = "Unknown Site";

/// Display names for hosts we know well. Keys are hosts without `www.`.
const FRIENDLY_SITE_NAMES: &[(&str, &str)] = &[
    ("allrecipes.com", "Allrecipes"),
    ("bbcgoodfood.com", "BBC Good Food"),
    ("bonappetit.com", "Bon Appétit"),
    ("cooking.nytimes.com", "NYT Cooking"),
    ("delish.com", "Delish"),
    ("epicurious.com", "Epicurious"),
    ("foodnetwork.com", "Food Network"),
    ("seriouseats.com", "Serious Eats"),
    ("simplyrecipes.com", "Simply Recipes"),
    ("tasty.co", "Tasty"),
];

/// Convert an ISO-8601 `PT..` duration into "X hours Y minutes".
///
/// Anything that does not start with `PT` is returned unchanged, as is a `PT`
/// value with neither an hour nor a minute component.
pub fn format_time(duration: &str) -> String {
    let duration = duration.trim();
    if !duration.starts_with("PT") {
        return duration.to_string();
    }

    let mut result = String::new();
    if let Some(hours) = HOURS.captures(duration) {
        result.push_str(&format!("{} hours ", &hours[1]));
    }
    if let Some(minutes) = MINUTES.captures(duration) {
        result.push_str(&format!("{} minutes", &minutes[1]));
    }

    let result = result.trim_end();
    if result.is_empty() {
        duration.to_string()
    } else {
        result.to_string()
    }
}

/// Host of `url` without a leading `www.`, or its friendly display name when
/// the host is a known recipe site.
pub fn get_site_name(url: &str) -> String {
    let Some(host) = Url::parse(url.trim())
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
    else {
        return UNKNOWN_SITE.to_string();
    };

    let host = host.strip_prefix("www.").unwrap_or(&host);
    FRIENDLY_SITE_NAMES
        .iter()
        .find(|(known, _)| *known == host)
        .map(|(_, friendly)| friendly.to_string())
        .unwrap_or_else(|| host.to_string())
}

/// Trim each line, drop blanks and join with newlines.
pub fn join_lines<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().trim().to_string())
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Number non-empty steps as "1. ..." and separate them with a blank line.
pub fn number_steps<I, S>(steps: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    steps
        .into_iter()
        .map(|step| step.as_ref().trim().to_string())
        .filter(|step| !step.is_empty())
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// First run of digits in a yield/serving text ("Serves 4 people" -> "4").
/// Text without digits is returned trimmed.
pub fn extract_servings(text: &str) -> String {
    NUMBER
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| text.trim().to_string())
}

/// Decode HTML entities and collapse runs of whitespace.
pub fn decode_html_symbols(text: &str) -> String {
    // pages frequently double-encode (`&amp;quot;`), so decode twice
    let decoded = decode_html_entities(&decode_html_entities(text)).into_owned();
    collapse_whitespace(&decoded)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `author` as it appears in the wild: a bare name, a Person/Organization
/// object, or a list of either.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AuthorValue {
    Name(String),
    Object {
        #[serde(default)]
        name: Option<serde_json::Value>,
    },
    Multiple(Vec<AuthorValue>),
    Other(serde_json::Value),
}

/// First non-empty author name, or an empty string.
pub fn resolve_author(author: &AuthorValue) -> String {
    match author {
        AuthorValue::Name(name) => decode_html_symbols(name),
        AuthorValue::Object { name } => match name {
            Some(serde_json::Value::String(name)) => decode_html_symbols(name),
            Some(other) => serde_json::from_value::<AuthorValue>(other.clone())
                .map(|nested| resolve_author(&nested))
                .unwrap_or_default(),
            None => String::new(),
        },
        AuthorValue::Multiple(authors) => authors
            .iter()
            .map(resolve_author)
            .find(|name| !name.is_empty())
            .unwrap_or_default(),
        AuthorValue::Other(_) => String::new(),
    }
}
