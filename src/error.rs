use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors that can occur during recipe import operations
#[derive(Error, Debug)]
pub enum ImportError {
    /// Missing or malformed input supplied by the caller
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Upstream answered with a non-2xx status
    #[error("Failed to fetch URL: HTTP {status} {reason}")]
    Fetch { status: u16, reason: String },

    /// Upstream did not answer within the time budget
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection, DNS or body read failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Malformed JSON-LD block
    #[error("Failed to parse structured data: {0}")]
    Parse(#[from] serde_json::Error),

    /// No extraction strategy produced any recipe data
    #[error("No extraction strategy could find recipe data on this page")]
    ExtractionFailure,

    /// Builder configuration error
    #[error("Builder error: {0}")]
    Builder(String),

    /// Error parsing HTTP headers
    #[error("Header parse error: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Listener could not be bound or stopped serving
    #[error("Server error: {0}")]
    Server(String),
}

impl ImportError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ImportError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ImportError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": self.to_string(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}
