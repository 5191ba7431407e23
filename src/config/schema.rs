//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the API tester backend.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener and client-facing settings.
    pub server: ServerConfig,

    /// Persistence settings.
    pub database: DatabaseConfig,

    /// Outbound relay client settings.
    pub relay: RelayConfig,

    /// Completion model settings.
    pub ai: AiConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,

    /// Origin of the browser client, allowed through CORS.
    pub client_url: String,

    /// Directory holding the built single-page client, served for unmatched paths.
    pub static_dir: Option<String>,

    /// Maximum accepted request body in bytes.
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            client_url: "http://localhost:5173".to_string(),
            static_dir: None,
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection string.
    pub url: String,

    /// Pool size.
    pub max_connections: u32,

    /// History entries older than this are purged.
    pub history_retention_secs: u64,

    /// Interval between retention sweeps.
    pub purge_interval_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://api-tester.db?mode=rwc".to_string(),
            max_connections: 5,
            history_retention_secs: 7 * 24 * 60 * 60,
            purge_interval_secs: 60 * 60,
        }
    }
}

/// Relay client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Total time allowed for one relayed call, in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Hosted completion model configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AiConfig {
    /// Bearer credential. Absent (or empty) disables annotations.
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API, without the trailing path.
    pub base_url: String,

    /// Model name sent with every completion.
    pub model: String,

    /// Token limit for response documentation.
    pub documentation_max_tokens: u32,

    /// Token limit for error explanations.
    pub explanation_max_tokens: u32,

    /// Completion request timeout in seconds.
    pub timeout_secs: u64,
}

impl AiConfig {
    /// The configured credential, if it is usable.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            documentation_max_tokens: 500,
            explanation_max_tokens: 300,
            timeout_secs: 60,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty for development, JSON for log shipping.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:5000");
        assert_eq!(config.database.history_retention_secs, 604_800);
        assert_eq!(config.ai.model, "gpt-4");
        assert_eq!(config.ai.documentation_max_tokens, 500);
        assert_eq!(config.ai.explanation_max_tokens, 300);
        assert!(config.ai.api_key.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [relay]
            timeout_secs = 5

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.relay.timeout_secs, 5);
        assert_eq!(config.relay.connect_timeout_secs, 10);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_blank_credential_is_absent() {
        let mut ai = AiConfig::default();
        ai.api_key = Some("   ".to_string());
        assert!(ai.credential().is_none());

        ai.api_key = Some("sk-test".to_string());
        assert_eq!(ai.credential(), Some("sk-test"));
    }
}
