use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::leads::Lead;
use crate::state::AppState;

pub async fn save_lead(
    State(state): State<Arc<AppState>>,
    Json(lead): Json<Lead>,
) -> Result<impl IntoResponse, ApiError> {
    state.leads.save(&lead).await?;
    Ok(Json(json!({"status": "ok"})))
}
