//! Request history documents.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::method::HttpMethod;
use crate::domain::validation::{required, ValidationError};

/// One persisted relay exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
    pub response: RecordedResponse,
    pub created_at: DateTime<Utc>,
}

/// The target server's answer as stored with a history entry.
///
/// `data` is `None` in listing payloads, where the body is left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Unvalidated history entry, as assembled by the relay handler.
#[derive(Debug, Clone)]
pub struct HistoryDraft {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
    pub status: u16,
    pub response_headers: BTreeMap<String, String>,
    pub data: Value,
}

impl HistoryDraft {
    /// Check the draft against the history schema and stamp it.
    pub fn validate(self, now: DateTime<Utc>) -> Result<HistoryEntry, ValidationError> {
        let method = required("method", Some(self.method))?;
        let method = method
            .parse::<HttpMethod>()
            .map_err(|e| ValidationError::InvalidMethod {
                field: "method",
                value: e.0,
            })?;
        let url = required("url", Some(self.url))?.trim().to_string();

        Ok(HistoryEntry {
            id: Uuid::new_v4().to_string(),
            method,
            url,
            headers: self.headers,
            body: self.body.unwrap_or(Value::Null),
            response: RecordedResponse {
                status: self.status,
                headers: self.response_headers,
                data: Some(self.data),
            },
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(method: &str, url: &str) -> HistoryDraft {
        HistoryDraft {
            method: method.to_string(),
            url: url.to_string(),
            headers: BTreeMap::new(),
            body: None,
            status: 200,
            response_headers: BTreeMap::new(),
            data: json!({"ok": true}),
        }
    }

    #[test]
    fn test_validate_normalises_method_and_url() {
        let entry = draft("get", "  https://example.com/a  ")
            .validate(Utc::now())
            .unwrap();
        assert_eq!(entry.method, HttpMethod::Get);
        assert_eq!(entry.url, "https://example.com/a");
        assert_eq!(entry.body, Value::Null);
        assert_eq!(entry.response.data, Some(json!({"ok": true})));
    }

    #[test]
    fn test_validate_rejects_unknown_method() {
        let err = draft("BREW", "https://example.com").validate(Utc::now()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidMethod {
                field: "method",
                value: "BREW".to_string()
            }
        );
    }

    #[test]
    fn test_listing_shape_omits_data() {
        let mut entry = draft("POST", "https://example.com").validate(Utc::now()).unwrap();
        entry.response.data = None;
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value["response"].get("data").is_none());
        assert!(value.get("_id").is_some());
        assert!(value.get("createdAt").is_some());
    }
}
