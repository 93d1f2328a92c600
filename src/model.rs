use serde::{Deserialize, Serialize};

/// Which extraction strategy produced a [`RecipeRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    StructuredData,
    HtmlParsing,
    Fallback,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::StructuredData => "structured-data",
            Source::HtmlParsing => "html-parsing",
            Source::Fallback => "fallback",
        }
    }
}

/// Normalized recipe returned to the caller.
///
/// Every field is a plain string so form bindings on the client never see
/// null; missing values are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRecord {
    pub name: String,
    pub description: String,
    /// One ingredient per line
    pub ingredients: String,
    /// Numbered steps separated by blank lines
    pub instructions: String,
    pub cook_time: String,
    pub servings: String,
    pub author: String,
    pub site_name: String,
    pub source: Source,
}

impl RecipeRecord {
    pub fn new(source: Source) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            ingredients: String::new(),
            instructions: String::new(),
            cook_time: String::new(),
            servings: String::new(),
            author: String::new(),
            site_name: String::new(),
            source,
        }
    }

    /// True when no content field was extracted. `site_name` is derived from
    /// the URL rather than the page, so it does not count.
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.description,
            &self.ingredients,
            &self.instructions,
            &self.cook_time,
            &self.servings,
            &self.author,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}

/// Body of `POST /recipe-import`
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Envelope returned by the import endpoint. `success` is always true; the
/// record's `source` tells the caller whether anything was extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResponse {
    pub success: bool,
    pub recipe: RecipeRecord,
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
