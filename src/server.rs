//! HTTP surface: `POST /recipe-import`.
//!
//! Failures to fetch or extract are answered in-band with a fallback record
//! and status 200; only a request without a usable `url` gets a 400.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ServerConfig;
use crate::model::ImportRequest;
use crate::{ImportError, RecipeImporter};

/// Build the axum Router with the import endpoint and permissive CORS.
pub fn router(importer: Arc<RecipeImporter>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/recipe-import", post(import_handler).options(preflight))
        .route("/health", get(health))
        .layer(cors)
        .with_state(importer)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, importer: Arc<RecipeImporter>) -> Result<(), ImportError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        ImportError::Server(format!("Failed to bind to {addr}: {e}"))
    })?;
    let local: SocketAddr = listener
        .local_addr()
        .map_err(|e| ImportError::Server(format!("Failed to read bound address: {e}")))?;

    info!("Recipe import server listening on http://{}/", local);
    info!("  - Import: POST http://{}/recipe-import", local);

    axum::serve(listener, router(importer))
        .await
        .map_err(|e| ImportError::Server(e.to_string()))
}

async fn import_handler(
    State(importer): State<Arc<RecipeImporter>>,
    body: Bytes,
) -> Result<Response, ImportError> {
    let url = parse_request(&body)?;
    info!("Importing recipe from {}", url);
    let response = importer.import(&url).await;
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Extract the `url` field, rejecting bodies without one.
fn parse_request(body: &[u8]) -> Result<String, ImportError> {
    let request: ImportRequest = serde_json::from_slice(body)
        .map_err(|e| ImportError::InvalidInput(format!("Request body must be JSON: {e}")))?;

    request
        .url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ImportError::InvalidInput("URL is required".to_string()))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn health() -> &'static str {
    "ok"
}
