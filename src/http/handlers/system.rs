use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;
use crate::http::ApiError;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub ai_enabled: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        ai_enabled: state.annotator.is_enabled(),
    })
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found")
}
