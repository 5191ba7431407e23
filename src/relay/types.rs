//! Relay input and output types.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Body of `POST /api/request`, exactly as the client sent it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayPayload {
    pub method: Option<String>,
    pub url: Option<String>,
    pub headers: Option<HeaderInput>,
    pub body: Option<Value>,
}

/// Headers arrive either as an object or as the raw JSON text of the
/// request builder's header field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HeaderInput {
    Map(BTreeMap<String, Value>),
    Text(String),
}

/// Rejections raised before any outbound call is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayInputError {
    #[error("URL is required")]
    MissingUrl,

    #[error("HTTP method is required")]
    MissingMethod,

    #[error("Invalid JSON in headers")]
    InvalidHeaders,
}

/// A validated relay call.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayRequest {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

/// The target server's answer, untransformed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub data: Value,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl RelayResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl RelayPayload {
    /// Check required fields. The URL is checked before the method.
    pub fn into_request(self) -> Result<RelayRequest, RelayInputError> {
        let url = self
            .url
            .filter(|u| !u.trim().is_empty())
            .ok_or(RelayInputError::MissingUrl)?;
        let method = self
            .method
            .filter(|m| !m.trim().is_empty())
            .ok_or(RelayInputError::MissingMethod)?;
        let headers = match self.headers {
            Some(input) => input.into_map()?,
            None => BTreeMap::new(),
        };

        Ok(RelayRequest {
            method,
            url,
            headers,
            body: self.body,
        })
    }
}

impl HeaderInput {
    pub fn into_map(self) -> Result<BTreeMap<String, String>, RelayInputError> {
        let raw = match self {
            HeaderInput::Map(map) => map,
            HeaderInput::Text(text) if text.trim().is_empty() => BTreeMap::new(),
            HeaderInput::Text(text) => serde_json::from_str::<BTreeMap<String, Value>>(&text)
                .map_err(|_| RelayInputError::InvalidHeaders)?,
        };

        Ok(raw
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((name, s)),
                other => Some((name, other.to_string())),
            })
            .collect())
    }
}
