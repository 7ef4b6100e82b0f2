use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn root() -> impl IntoResponse {
    Json(json!({"status": "running"}))
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "faq_count": state.pipeline.faq_count(),
        "dimension": state.pipeline.dimension(),
        "started_at": state.started_at.to_rfc3339(),
    }))
}
