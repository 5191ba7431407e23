//! Outbound HTTP client for relayed calls.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::RelayConfig;
use crate::relay::types::{RelayRequest, RelayResponse};

/// Failures of a relayed call.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The request could not be built; nothing was sent.
    #[error("{0}")]
    Invalid(String),

    /// The call went out but no response came back (refused, DNS, timeout, reset).
    #[error("No response received from server: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl RelayError {
    /// Whether the target was contacted (or tried) without an answer coming back.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, RelayError::Unreachable(_))
    }
}

/// Shared relay client. Cheap to clone; connections are pooled.
#[derive(Clone, Debug)]
pub struct RelayClient {
    inner: reqwest::Client,
}

impl RelayClient {
    /// Build the pooled client with the configured total and connect timeouts.
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(RelayError::Client)?;
        Ok(Self { inner })
    }

    /// Send `request` and return whatever the target answered, any status.
    pub async fn send(&self, request: &RelayRequest) -> Result<RelayResponse, RelayError> {
        let method = parse_method(&request.method)?;
        let url = parse_target(&request.url)?;
        let mut headers = build_headers(&request.headers)?;

        let mut builder = self.inner.request(method.clone(), url.clone());
        match &request.body {
            None => {}
            Some(Value::String(text)) => builder = builder.body(text.clone()),
            Some(value) => {
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }
                let bytes = serde_json::to_vec(value)
                    .map_err(|e| RelayError::Invalid(format!("Unencodable body: {}", e)))?;
                builder = builder.body(bytes);
            }
        }
        builder = builder.headers(headers);

        tracing::debug!(method = %method, url = %url, "Relaying request");
        let started = Instant::now();

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let headers = flatten_headers(response.headers());
        let bytes = response.bytes().await.map_err(RelayError::Unreachable)?;
        let elapsed = started.elapsed();

        tracing::debug!(
            method = %method,
            url = %url,
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Relay response received"
        );

        Ok(RelayResponse {
            status,
            headers,
            data: decode_body(&bytes),
            elapsed,
        })
    }
}

fn classify(err: reqwest::Error) -> RelayError {
    if err.is_builder() {
        RelayError::Invalid(err.to_string())
    } else {
        RelayError::Unreachable(err)
    }
}

fn parse_target(raw: &str) -> Result<Url, RelayError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| RelayError::Invalid(format!("Invalid URL '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RelayError::Invalid(format!("Unsupported URL scheme: {}", other))),
    }
}

fn build_headers(raw: &BTreeMap<String, String>) -> Result<HeaderMap, RelayError> {
    let mut headers = HeaderMap::with_capacity(raw.len());
    for (name, value) in raw {
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|_| RelayError::Invalid(format!("Invalid header name: {}", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| RelayError::Invalid(format!("Invalid value for header {}", name)))?;
        headers.append(name, value);
    }
    Ok(headers)
}

/// Uppercase and accept any valid method token, not only the common verbs.
fn parse_method(raw: &str) -> Result<Method, RelayError> {
    let upper = raw.trim().to_ascii_uppercase();
    Method::from_bytes(upper.as_bytes())
        .map_err(|_| RelayError::Invalid(format!("Invalid HTTP method: {}", raw)))
}

/// Collapse a header map into name → value; repeated names are joined with ", ".
pub fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        flat.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    flat
}

/// JSON bodies are parsed; anything else is kept as text.
pub fn decode_body(bytes: &[u8]) -> Value {
    let text = String::from_utf8_lossy(bytes);
    serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text.into_owned()))
}
