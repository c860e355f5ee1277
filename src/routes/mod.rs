// Route exports
pub mod pairing;
pub mod users;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::core::{DiversityMatcher, PairingError};
use crate::models::ErrorResponse;
use crate::services::{EmbeddingError, EmbeddingProvider, StoreError, UserStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub embeddings: Arc<dyn EmbeddingProvider>,
    pub store: Arc<dyn UserStore>,
    pub matcher: DiversityMatcher,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(pairing::configure)
            .configure(users::configure),
    );
}

/// Register the JSON error handlers for body and query extraction
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error));
}

/// JSON error response for payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
        status_code: status.as_u16(),
    })
}

pub(crate) fn pairing_error_response(err: &PairingError) -> HttpResponse {
    if err.is_caller_error() {
        tracing::info!("Rejected pairing input: {}", err);
        error_response(StatusCode::BAD_REQUEST, "Invalid pairing input", err)
    } else {
        tracing::error!("Embedding output unusable for pairing: {}", err);
        error_response(StatusCode::BAD_GATEWAY, "Invalid embeddings", err)
    }
}

pub(crate) fn embedding_error_response(err: &EmbeddingError) -> HttpResponse {
    tracing::error!("Embedding request failed: {}", err);
    error_response(StatusCode::BAD_GATEWAY, "Failed to generate embeddings", err)
}

pub(crate) fn store_error_response(err: &StoreError) -> HttpResponse {
    match err {
        StoreError::NotFound(_) => error_response(StatusCode::NOT_FOUND, "User not found", err),
        StoreError::Conflict(_) => error_response(StatusCode::CONFLICT, "User already exists", err),
        _ => {
            tracing::error!("User store error: {}", err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "User store error", err)
        }
    }
}
