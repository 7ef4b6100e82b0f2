use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::chat::ChatAnswer;
use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatPayload {
    #[serde(default)]
    pub conversation_id: Option<String>,
    pub message: String,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatPayload>,
) -> Result<Json<ChatAnswer>, ApiError> {
    tracing::debug!(
        conversation_id = payload.conversation_id.as_deref().unwrap_or("-"),
        "Chat message received"
    );
    let answer = state.pipeline.answer(&payload.message).await?;
    Ok(Json(answer))
}
