//! Collections of saved request templates.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::method::SavedRequestMethod;
use crate::domain::validation::{required, ValidationError};

/// A named, ordered group of saved requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub requests: Vec<SavedRequest>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A request template embedded in a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub method: SavedRequestMethod,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Client payload for creating or replacing a collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub requests: Option<Vec<SavedRequestInput>>,
}

/// Client payload for one saved request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavedRequestInput {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub method: Option<String>,
    pub url: Option<String>,
    pub headers: Option<BTreeMap<String, String>>,
    pub body: Option<Value>,
    pub description: Option<String>,
}

/// Validated collection fields, ready to be applied to a document.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionFields {
    pub name: String,
    pub description: String,
    pub requests: Vec<SavedRequest>,
}

impl SavedRequestInput {
    /// Validate and assign an id when the client did not send one.
    pub fn validate(self) -> Result<SavedRequest, ValidationError> {
        let name = required("name", self.name)?;
        let method = required("method", self.method)?;
        let method = method
            .parse::<SavedRequestMethod>()
            .map_err(|e| ValidationError::InvalidMethod {
                field: "method",
                value: e.0,
            })?;
        let url = required("url", self.url)?;

        Ok(SavedRequest {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(new_id),
            name,
            method,
            url,
            headers: self.headers,
            body: self.body,
            description: self.description,
        })
    }
}

impl CollectionInput {
    pub fn validate(self) -> Result<CollectionFields, ValidationError> {
        let name = required("name", self.name)?;
        let requests = self
            .requests
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, request)| {
                request
                    .validate()
                    .map_err(|source| ValidationError::InvalidRequest {
                        index,
                        source: Box::new(source),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CollectionFields {
            name,
            description: self.description.unwrap_or_default(),
            requests,
        })
    }
}

impl Collection {
    pub fn new(fields: CollectionFields, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(6);
        Self {
            id: new_id(),
            name: fields.name,
            description: fields.description,
            requests: fields.requests,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full replace of the user-editable fields.
    pub fn replace(&mut self, fields: CollectionFields, now: DateTime<Utc>) {
        self.name = fields.name;
        self.description = fields.description;
        self.requests = fields.requests;
        self.touch(now);
    }

    /// Append a validated saved request and refresh `updated_at`.
    pub fn push_request(&mut self, request: SavedRequest, now: DateTime<Utc>) {
        self.requests.push(request);
        self.touch(now);
    }

    /// Drop the saved request with `request_id`. Returns whether one matched.
    /// The document is re-saved either way.
    pub fn remove_request(&mut self, request_id: &str, now: DateTime<Utc>) -> bool {
        let before = self.requests.len();
        self.requests.retain(|r| r.id != request_id);
        self.touch(now);
        self.requests.len() != before
    }

    /// Refresh `updated_at`, always moving it strictly forward.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let floor = self.updated_at + Duration::microseconds(1);
        self.updated_at = now.trunc_subsecs(6).max(floor);
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(name: &str, method: &str) -> SavedRequestInput {
        SavedRequestInput {
            name: Some(name.to_string()),
            method: Some(method.to_string()),
            url: Some("https://example.com/users".to_string()),
            ..Default::default()
        }
    }

    fn collection(name: &str) -> Collection {
        let fields = CollectionInput {
            name: Some(name.to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        Collection::new(fields, Utc::now())
    }

    #[test]
    fn test_name_is_required() {
        let err = CollectionInput::default().validate().unwrap_err();
        assert_eq!(err, ValidationError::Required("name"));
    }

    #[test]
    fn test_defaults() {
        let c = collection("Smoke");
        assert_eq!(c.description, "");
        assert!(c.requests.is_empty());
        assert_eq!(c.created_at, c.updated_at);
    }

    #[test]
    fn test_request_method_subset_enforced() {
        let input = CollectionInput {
            name: Some("Smoke".to_string()),
            requests: Some(vec![request("ok", "GET"), request("bad", "PATCH")]),
            ..Default::default()
        };
        let err = input.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidRequest {
                index: 1,
                source: Box::new(ValidationError::InvalidMethod {
                    field: "method",
                    value: "PATCH".to_string()
                }),
            }
        );
    }

    #[test]
    fn test_supplied_request_id_is_kept() {
        let mut input = request("list", "GET");
        input.id = Some("keep-me".to_string());
        assert_eq!(input.validate().unwrap().id, "keep-me");
        assert!(!request("list", "GET").validate().unwrap().id.is_empty());
    }

    #[test]
    fn test_push_and_remove_request() {
        let mut c = collection("Smoke");
        let saved = request("list", "GET").validate().unwrap();
        let id = saved.id.clone();
        c.push_request(saved, Utc::now());
        assert_eq!(c.requests.len(), 1);
        assert_eq!(c.requests[0].id, id);

        assert!(!c.remove_request("unknown", Utc::now()));
        assert_eq!(c.requests.len(), 1);
        assert!(c.remove_request(&id, Utc::now()));
        assert!(c.requests.is_empty());
    }

    #[test]
    fn test_touch_is_strictly_increasing() {
        let mut c = collection("Smoke");
        let before = c.updated_at;
        // A clock that did not move (or moved backwards) still advances the stamp.
        c.touch(before - Duration::seconds(5));
        assert!(c.updated_at > before);
    }

    #[test]
    fn test_serialised_field_names() {
        let mut c = collection("Smoke");
        let mut input = request("create", "POST");
        input.body = Some(json!({"name": "x"}));
        c.push_request(input.validate().unwrap(), Utc::now());

        let value = serde_json::to_value(&c).unwrap();
        assert!(value.get("_id").is_some());
        assert!(value.get("updatedAt").is_some());
        assert_eq!(value["requests"][0]["method"], "POST");
        assert_eq!(value["requests"][0]["body"]["name"], "x");
        assert!(value["requests"][0].get("headers").is_none());
    }
}
