//! Collection CRUD and saved-request management.
//!
//! Every mutation loads the document, applies the change in memory and
//! writes the whole collection back.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::domain::{self, Collection, CollectionInput, SavedRequestInput};
use crate::http::extract::JsonBody;
use crate::http::server::AppState;
use crate::http::ApiError;

const NOT_FOUND: &str = "Collection not found";

async fn load(state: &AppState, id: &str) -> Result<Collection, ApiError> {
    state
        .store
        .collections()
        .get(id)
        .await
        .map_err(ApiError::storage("Failed to fetch collection"))?
        .ok_or(ApiError::NotFound(NOT_FOUND))
}

async fn save(state: &AppState, collection: &Collection) -> Result<(), ApiError> {
    let found = state
        .store
        .collections()
        .save(collection)
        .await
        .map_err(ApiError::storage("Failed to save collection"))?;
    if found {
        Ok(())
    } else {
        // Deleted between load and save.
        Err(ApiError::NotFound(NOT_FOUND))
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Collection>>, ApiError> {
    let collections = state
        .store
        .collections()
        .list()
        .await
        .map_err(ApiError::storage("Failed to fetch collections"))?;
    Ok(Json(collections))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Collection>, ApiError> {
    load(&state, &id).await.map(Json)
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CollectionInput>,
) -> Result<(StatusCode, Json<Collection>), ApiError> {
    let collection = Collection::new(input.validate()?, domain::timestamp());
    state
        .store
        .collections()
        .insert(&collection)
        .await
        .map_err(ApiError::storage("Failed to create collection"))?;

    tracing::info!(id = %collection.id, name = %collection.name, "Collection created");
    Ok((StatusCode::CREATED, Json(collection)))
}

/// Full replace. An unknown id is reported before any validation problem.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<CollectionInput>,
) -> Result<Json<Collection>, ApiError> {
    let mut collection = load(&state, &id).await?;
    collection.replace(input.validate()?, domain::timestamp());
    save(&state, &collection).await?;

    tracing::info!(id = %collection.id, "Collection updated");
    Ok(Json(collection))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let removed = state
        .store
        .collections()
        .delete(&id)
        .await
        .map_err(ApiError::storage("Failed to delete collection"))?;
    if !removed {
        return Err(ApiError::NotFound(NOT_FOUND));
    }

    tracing::info!(id = %id, "Collection deleted");
    Ok(Json(json!({ "message": "Collection deleted successfully" })))
}

pub async fn add_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(mut input): JsonBody<SavedRequestInput>,
) -> Result<(StatusCode, Json<Collection>), ApiError> {
    let mut collection = load(&state, &id).await?;

    // Appended requests always get a fresh id.
    input.id = None;
    let saved = input.validate()?;
    let request_id = saved.id.clone();
    collection.push_request(saved, domain::timestamp());
    save(&state, &collection).await?;

    tracing::info!(id = %collection.id, request_id = %request_id, "Saved request added");
    Ok((StatusCode::CREATED, Json(collection)))
}

pub async fn remove_request(
    State(state): State<AppState>,
    Path((id, request_id)): Path<(String, String)>,
) -> Result<Json<Collection>, ApiError> {
    let mut collection = load(&state, &id).await?;
    let removed = collection.remove_request(&request_id, domain::timestamp());
    save(&state, &collection).await?;

    tracing::info!(id = %collection.id, request_id = %request_id, removed, "Saved request removed");
    Ok(Json(collection))
}
