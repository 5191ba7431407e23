//! `POST /api/request`: relay, record, annotate.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::domain::{self, HistoryDraft};
use crate::http::extract::JsonBody;
use crate::http::server::AppState;
use crate::http::ApiError;
use crate::observability::metrics;
use crate::relay::{RelayPayload, RelayRequest, RelayResponse};

const UNREACHABLE_ERROR: &str = "No response received from server";
const UNREACHABLE_EXPLANATION: &str = "The server is unreachable or not responding";
const LOCAL_EXPLANATION: &str = "An error occurred while processing your request";

pub async fn send_request(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RelayPayload>,
) -> Result<Response, ApiError> {
    let mut request = payload.into_request()?;
    request.method = request.method.trim().to_ascii_uppercase();

    let response = match state.relay.send(&request).await {
        Ok(response) => response,
        Err(e) if e.is_unreachable() => {
            tracing::warn!(
                method = %request.method,
                url = %request.url,
                error = %e,
                "Target unreachable"
            );
            metrics::record_relay(&request.method, "unreachable");
            return Ok(failure(
                StatusCode::SERVICE_UNAVAILABLE,
                UNREACHABLE_ERROR.to_string(),
                UNREACHABLE_EXPLANATION,
            ));
        }
        Err(e) => {
            tracing::warn!(
                method = %request.method,
                url = %request.url,
                error = %e,
                "Relay request rejected locally"
            );
            metrics::record_relay(&request.method, "invalid");
            return Ok(failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
                LOCAL_EXPLANATION,
            ));
        }
    };

    tracing::info!(
        method = %request.method,
        url = %request.url,
        status = response.status,
        elapsed_ms = response.elapsed.as_millis() as u64,
        "Request relayed"
    );
    metrics::record_relay(&request.method, metrics::status_class(response.status));
    metrics::record_relay_latency(response.elapsed);

    record_history(&state, &request, &response).await;

    let annotation = state
        .annotator
        .annotate(&request.method, &request.url, &response)
        .await;

    let mut body = json!({
        "status": response.status,
        "data": response.data,
        "headers": response.headers,
    });
    body[annotation.field()] = Value::String(annotation.text().to_string());

    Ok((StatusCode::OK, Json(body)).into_response())
}

fn failure(status: StatusCode, error: String, explanation: &str) -> Response {
    let body = json!({
        "status": status.as_u16(),
        "error": error,
        "explanation": explanation,
    });
    (status, Json(body)).into_response()
}

/// Persist the exchange. Failures are logged and never reach the client.
async fn record_history(state: &AppState, request: &RelayRequest, response: &RelayResponse) {
    let draft = HistoryDraft {
        method: request.method.clone(),
        url: request.url.clone(),
        headers: request.headers.clone(),
        body: request.body.clone(),
        status: response.status,
        response_headers: response.headers.clone(),
        data: response.data.clone(),
    };

    let entry = match draft.validate(domain::timestamp()) {
        Ok(entry) => entry,
        Err(e) => {
            tracing::error!(
                method = %request.method,
                url = %request.url,
                error = %e,
                "Error saving to history"
            );
            return;
        }
    };

    if let Err(e) = state.store.history().insert(&entry).await {
        tracing::error!(id = %entry.id, error = %e, "Error saving to history");
    }
}
