//! HTTP verb enumerations accepted by persisted entities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Methods a history entry may record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a member of a method enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    /// Case-insensitive; stored values are always uppercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

/// Methods a saved collection request may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SavedRequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl SavedRequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SavedRequestMethod::Get => "GET",
            SavedRequestMethod::Post => "POST",
            SavedRequestMethod::Put => "PUT",
            SavedRequestMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for SavedRequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SavedRequestMethod {
    type Err = UnknownMethod;

    /// Exact match: saved requests store the verb exactly as given.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(SavedRequestMethod::Get),
            "POST" => Ok(SavedRequestMethod::Post),
            "PUT" => Ok(SavedRequestMethod::Put),
            "DELETE" => Ok(SavedRequestMethod::Delete),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}
