//! History listing and housekeeping.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::domain::{HistoryEntry, PageInfo, PageQuery, Pagination};
use crate::http::server::AppState;
use crate::http::ApiError;

const ENTRY_NOT_FOUND: &str = "History entry not found";

#[derive(Debug, Serialize)]
pub struct HistoryPage {
    pub history: Vec<HistoryEntry>,
    pub pagination: PageInfo,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<HistoryPage>, ApiError> {
    let pagination = Pagination::from(query);
    let (history, total) = state
        .store
        .history()
        .list(pagination)
        .await
        .map_err(ApiError::storage("Failed to fetch request history"))?;

    Ok(Json(HistoryPage {
        history,
        pagination: PageInfo::new(pagination, total),
    }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryEntry>, ApiError> {
    state
        .store
        .history()
        .get(&id)
        .await
        .map_err(ApiError::storage("Failed to fetch history entry"))?
        .map(Json)
        .ok_or(ApiError::NotFound(ENTRY_NOT_FOUND))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let removed = state
        .store
        .history()
        .delete(&id)
        .await
        .map_err(ApiError::storage("Failed to delete history entry"))?;
    if !removed {
        return Err(ApiError::NotFound(ENTRY_NOT_FOUND));
    }

    tracing::info!(id = %id, "History entry deleted");
    Ok(Json(json!({ "message": "History entry deleted successfully" })))
}

pub async fn clear(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let deleted = state
        .store
        .history()
        .clear()
        .await
        .map_err(ApiError::storage("Failed to clear history"))?;

    tracing::info!(deleted, "History cleared");
    Ok(Json(json!({ "message": "History cleared", "deleted": deleted })))
}
