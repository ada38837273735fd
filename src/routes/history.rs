use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::AppState;
use crate::error::AppError;
use crate::history::HistoryEntry;

pub async fn list_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.list().await)
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<HistoryEntry>, AppError> {
    state
        .history
        .get(id)
        .await
        .map(Json)
        .ok_or(AppError::NotFound(id))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    if state.history.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(id))
    }
}

pub async fn clear_history(State(state): State<AppState>) -> StatusCode {
    state.history.clear().await;
    StatusCode::NO_CONTENT
}
