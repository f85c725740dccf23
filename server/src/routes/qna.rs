use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use mention_pipeline::answer_question;
use mentionlens_core::ContextMention;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error_body;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reddit-qna", post(post_qna))
        .route("/reddit-qna/", post(post_qna))
}

#[derive(Debug, Deserialize)]
struct QnaRequest {
    question: String,
    search_term: String,
    #[serde(default)]
    context_mentions: Vec<ContextMention>,
}

#[derive(Debug, Serialize)]
struct QnaResponse {
    answer: Option<String>,
    error: Option<String>,
}

async fn post_qna(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QnaRequest>,
) -> impl IntoResponse {
    let question = request.question.trim();
    let search_term = request.search_term.trim();

    // Reject before any external call
    if question.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            error_body("Question is required and cannot be empty."),
        )
            .into_response();
    }
    if search_term.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            error_body("Search term is required and cannot be empty."),
        )
            .into_response();
    }
    if request.context_mentions.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            error_body("No mention context supplied for Q&A."),
        )
            .into_response();
    }

    let Some(engine) = state.narrative_engine.as_deref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            error_body("Narrative engine is not configured."),
        )
            .into_response();
    };

    info!(
        "Q&A request for {:?} over {} context mentions",
        search_term,
        request.context_mentions.len()
    );
    let outcome = answer_question(engine, question, search_term, &request.context_mentions).await;

    (
        StatusCode::OK,
        Json(QnaResponse {
            answer: outcome.answer,
            error: outcome.error,
        }),
    )
        .into_response()
}
