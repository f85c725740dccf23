use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use mention_pipeline::MentionRun;
use serde::Deserialize;
use tracing::info;

use super::{error_body, error_response};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reddit-mentions", get(get_mentions))
        .route("/reddit-mentions/", get(get_mentions))
}

#[derive(Debug, Deserialize)]
struct MentionsQuery {
    term: Option<String>,
}

async fn get_mentions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MentionsQuery>,
) -> impl IntoResponse {
    let term = query.term.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            error_body("Search term ('term') is required and cannot be empty."),
        )
            .into_response();
    }

    info!("Mention report requested for {:?}", term);
    let run = MentionRun::new(
        state.content_source.as_ref(),
        &state.classifier,
        state.narrative_engine.as_deref(),
        state.run_config.clone(),
    );

    match run.execute(term).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error).into_response(),
    }
}
