//! HTTP route handlers for the mentions and Q&A API.

pub mod mentions;
pub mod qna;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Json, Router};
use mentionlens_core::{CoreError, ErrorExt};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new().merge(mentions::routes()).merge(qna::routes())
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn error_body(message: impl Into<String>) -> Json<ErrorBody> {
    Json(ErrorBody {
        error: message.into(),
    })
}

/// Map the error taxonomy onto HTTP statuses: client mistakes are 400,
/// upstream collaborator failures 503, everything else a generic 500 with
/// the detail kept in the logs.
pub fn error_response(error: CoreError) -> (StatusCode, Json<ErrorBody>) {
    error.log_error();
    match &error {
        CoreError::InvalidInput { message } => {
            (StatusCode::BAD_REQUEST, error_body(message.clone()))
        }
        CoreError::RedditApi(_) | CoreError::Network(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            error_body(format!("Reddit API error: {}", error)),
        ),
        CoreError::Llm(mentionlens_core::LlmError::NotConfigured) => (
            StatusCode::SERVICE_UNAVAILABLE,
            error_body("Narrative engine is not configured.".to_string()),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body("An unexpected server error occurred.".to_string()),
        ),
    }
}
