use std::collections::BTreeMap;

use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a relay call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayCall {
    pub method: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl RelayCall {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }
}

/// A saved request inside a collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedRequestSpec {
    pub name: String,
    pub method: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fields for creating or replacing a collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests: Option<Vec<SavedRequestSpec>>,
}

/// Status and JSON body of any API call. Non-2xx answers are not errors
/// here; the relay endpoint uses them for ordinary results.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body's `error` field, when present.
    pub fn error(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

pub struct ApiTesterClient {
    client: Client,
    base_url: String,
}

impl ApiTesterClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxy settings).
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/api{}", self.base_url, path))
    }

    async fn send(builder: RequestBuilder) -> Result<ApiResponse, reqwest::Error> {
        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok(ApiResponse { status, body })
    }

    pub async fn health(&self) -> Result<ApiResponse, reqwest::Error> {
        Self::send(self.request(Method::GET, "/health")).await
    }

    /// Relay a request through the backend.
    pub async fn send_request(&self, call: &RelayCall) -> Result<ApiResponse, reqwest::Error> {
        Self::send(self.request(Method::POST, "/request").json(call)).await
    }

    pub async fn history(&self, page: u32, limit: u32) -> Result<ApiResponse, reqwest::Error> {
        let query = [("page", page.to_string()), ("limit", limit.to_string())];
        Self::send(self.request(Method::GET, "/history").query(&query)).await
    }

    pub async fn history_entry(&self, id: &str) -> Result<ApiResponse, reqwest::Error> {
        Self::send(self.request(Method::GET, &format!("/history/{}", id))).await
    }

    pub async fn delete_history_entry(&self, id: &str) -> Result<ApiResponse, reqwest::Error> {
        Self::send(self.request(Method::DELETE, &format!("/history/{}", id))).await
    }

    pub async fn clear_history(&self) -> Result<ApiResponse, reqwest::Error> {
        Self::send(self.request(Method::DELETE, "/history")).await
    }

    pub async fn collections(&self) -> Result<ApiResponse, reqwest::Error> {
        Self::send(self.request(Method::GET, "/collections")).await
    }

    pub async fn collection(&self, id: &str) -> Result<ApiResponse, reqwest::Error> {
        Self::send(self.request(Method::GET, &format!("/collections/{}", id))).await
    }

    pub async fn create_collection(
        &self,
        collection: &CollectionSpec,
    ) -> Result<ApiResponse, reqwest::Error> {
        Self::send(self.request(Method::POST, "/collections").json(collection)).await
    }

    pub async fn update_collection(
        &self,
        id: &str,
        collection: &CollectionSpec,
    ) -> Result<ApiResponse, reqwest::Error> {
        Self::send(
            self.request(Method::PUT, &format!("/collections/{}", id))
                .json(collection),
        )
        .await
    }

    pub async fn delete_collection(&self, id: &str) -> Result<ApiResponse, reqwest::Error> {
        Self::send(self.request(Method::DELETE, &format!("/collections/{}", id))).await
    }

    pub async fn add_request(
        &self,
        collection_id: &str,
        request: &SavedRequestSpec,
    ) -> Result<ApiResponse, reqwest::Error> {
        Self::send(
            self.request(Method::POST, &format!("/collections/{}/requests", collection_id))
                .json(request),
        )
        .await
    }

    pub async fn remove_request(
        &self,
        collection_id: &str,
        request_id: &str,
    ) -> Result<ApiResponse, reqwest::Error> {
        Self::send(self.request(
            Method::DELETE,
            &format!("/collections/{}/requests/{}", collection_id, request_id),
        ))
        .await
    }
}
