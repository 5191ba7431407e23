//! AI annotation of relayed responses.
//!
//! # Data Flow
//! ```text
//! RelayResponse
//!     → 2xx      → documentation prompt → completion (500 tokens) → "documentation"
//!     → non-2xx  → explanation prompt   → completion (300 tokens) → "explanation"
//!
//! no credential      → fixed "disabled" text
//! completion failure → fixed "failed" text (logged, never surfaced as an error)
//! ```

pub mod openai;
pub mod prompts;

use std::time::Duration;

use serde_json::Value;

use crate::config::AiConfig;
use crate::observability::metrics;
use crate::relay::RelayResponse;

pub use openai::{AnnotationError, CompletionClient};

/// Text attached to a relay result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Documentation(String),
    Explanation(String),
}

impl Annotation {
    /// JSON field the text is returned under.
    pub fn field(&self) -> &'static str {
        match self {
            Annotation::Documentation(_) => "documentation",
            Annotation::Explanation(_) => "explanation",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Annotation::Documentation(text) | Annotation::Explanation(text) => text,
        }
    }
}

/// Produces annotations. Without a credential every call yields the
/// "disabled" text and no network traffic happens.
#[derive(Clone, Debug)]
pub struct Annotator {
    client: Option<CompletionClient>,
    documentation_max_tokens: u32,
    explanation_max_tokens: u32,
}

impl Annotator {
    pub fn from_config(config: &AiConfig) -> Result<Self, AnnotationError> {
        let client = match config.credential() {
            Some(key) => Some(CompletionClient::new(
                &config.base_url,
                key,
                &config.model,
                Duration::from_secs(config.timeout_secs),
            )?),
            None => {
                tracing::warn!("OPENAI_API_KEY not configured, AI annotations disabled");
                None
            }
        };

        Ok(Self {
            client,
            documentation_max_tokens: config.documentation_max_tokens,
            explanation_max_tokens: config.explanation_max_tokens,
        })
    }

    /// Annotator that never calls out; every request gets the "disabled" text.
    pub fn disabled() -> Self {
        Self {
            client: None,
            documentation_max_tokens: 500,
            explanation_max_tokens: 300,
        }
    }

    /// Whether a completion credential was configured.
    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Documentation for successful responses, an explanation otherwise.
    pub async fn annotate(&self, method: &str, url: &str, response: &RelayResponse) -> Annotation {
        if response.is_success() {
            Annotation::Documentation(
                self.document(method, url, response.status, &response.data)
                    .await,
            )
        } else {
            Annotation::Explanation(self.explain(response.status, &response.data).await)
        }
    }

    /// Markdown documentation for a successful call.
    pub async fn document(&self, method: &str, url: &str, status: u16, data: &Value) -> String {
        let Some(client) = &self.client else {
            metrics::record_annotation("documentation", "disabled");
            return prompts::DOCUMENTATION_DISABLED.to_string();
        };

        let prompt = prompts::documentation(method, url, status, data);
        match client.complete(&prompt, self.documentation_max_tokens).await {
            Ok(text) => {
                metrics::record_annotation("documentation", "ok");
                text
            }
            Err(e) => {
                tracing::error!(error = %e, method, url, "Error generating documentation");
                metrics::record_annotation("documentation", "failed");
                prompts::DOCUMENTATION_FAILED.to_string()
            }
        }
    }

    /// Plain-language explanation of an error response, with a suggested fix.
    pub async fn explain(&self, status: u16, data: &Value) -> String {
        let Some(client) = &self.client else {
            metrics::record_annotation("explanation", "disabled");
            return prompts::EXPLANATION_DISABLED.to_string();
        };

        let prompt = prompts::explanation(status, data);
        match client.complete(&prompt, self.explanation_max_tokens).await {
            Ok(text) => {
                metrics::record_annotation("explanation", "ok");
                text
            }
            Err(e) => {
                tracing::error!(error = %e, status, "Error explaining error");
                metrics::record_annotation("explanation", "failed");
                prompts::EXPLANATION_FAILED.to_string()
            }
        }
    }
}
