//! HTTP request handlers for the content processing service.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::batch::{BatchConfig, BatchProcessor};
use crate::processing::Language;
use crate::processor::{ContentProcessor, CODE_FIELD, HTML_FIELD};
use crate::types::{BatchRequest, BatchResponse, ProcessRequest, ProcessResponse, ServiceConfig};

/// Application state shared across handlers.
pub struct AppState {
    pub processor: Arc<ContentProcessor>,
    pub config: ServiceConfig,
}

impl AppState {
    /// Create state with a processor built from the service configuration.
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            processor: Arc::new(ContentProcessor::new(config.processor.clone())),
            config,
        }
    }
}

/// Build the service routes.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_request_size;

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Handler table
        .route("/languages", get(list_languages))
        // Processing
        .route("/process", post(process_content))
        .route("/process/object", post(process_object))
        .route("/process/batch", post(process_batch))
        .layer(DefaultBodyLimit::max(body_limit))
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Language information.
#[derive(Debug, Serialize)]
pub struct LanguageInfo {
    name: String,
    aliases: Vec<String>,
    description: String,
}

/// List the languages the processor handles.
pub async fn list_languages(State(state): State<Arc<AppState>>) -> Json<Vec<LanguageInfo>> {
    let languages = state
        .processor
        .router()
        .list_handlers()
        .into_iter()
        .map(|(name, description)| LanguageInfo {
            aliases: Language::from_tag(&name)
                .map(|language| language.aliases().iter().map(|a| a.to_string()).collect())
                .unwrap_or_default(),
            name,
            description,
        })
        .collect();

    Json(languages)
}

/// Process a single snippet.
pub async fn process_content(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, StatusCode> {
    if request.content.len() > state.config.max_content_size {
        warn!(
            size = request.content.len(),
            max = state.config.max_content_size,
            "Rejected oversized content"
        );
        return Err(StatusCode::PAYLOAD_TOO_LARGE);
    }

    let (content, language) = state
        .processor
        .process_resolved(&request.content, request.language.as_deref());

    Ok(Json(ProcessResponse {
        content,
        language: language.to_string(),
    }))
}

/// Process every `code`/`html` field of a record tree.
pub async fn process_object(
    State(state): State<Arc<AppState>>,
    Json(value): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let size = content_size(&value);
    if size > state.config.max_content_size {
        warn!(
            size,
            max = state.config.max_content_size,
            "Rejected oversized record"
        );
        return Err(StatusCode::PAYLOAD_TOO_LARGE);
    }

    Ok(Json(state.processor.process_object(&value)))
}

/// Total length of the `code`/`html` strings a record tree would process.
fn content_size(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.iter().map(content_size).sum(),
        Value::Object(record) => record
            .iter()
            .map(|(key, value)| match (key.as_str(), value) {
                (CODE_FIELD | HTML_FIELD, Value::String(content)) => content.len(),
                _ => content_size(value),
            })
            .sum(),
        _ => 0,
    }
}

/// Process a batch of data documents.
pub async fn process_batch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, StatusCode> {
    info!(documents = request.documents.len(), "Received batch request");

    let batch = BatchProcessor::new(
        Arc::clone(&state.processor),
        BatchConfig {
            continue_on_error: state.config.batch_continue_on_error,
            max_content_size: state.config.max_content_size,
        },
    );

    let outcome = tokio::task::spawn_blocking(move || batch.process_batch(request.documents))
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    match outcome {
        Ok((documents, result)) => Ok(Json(BatchResponse { documents, result })),
        Err(e) => {
            let message = format!("{:#}", e);
            warn!(error = %message, "Batch aborted");
            Err(StatusCode::UNPROCESSABLE_ENTITY)
        }
    }
}
