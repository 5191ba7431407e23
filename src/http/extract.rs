//! Request extractors.

use axum::extract::FromRequest;

use crate::http::error::ApiError;

/// `axum::Json` with rejections rendered as `{"error": ...}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
