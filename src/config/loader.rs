//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment-supplied settings onto a parsed config.
///
/// `lookup` is `std::env::var` in production; tests pass a map.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(addr) = lookup("BIND_ADDRESS") {
        config.server.bind_address = addr;
    } else if let Some(port) = lookup("PORT") {
        let host = config
            .server
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.server.bind_address = format!("{}:{}", host, port);
    }
    if let Some(client_url) = lookup("CLIENT_URL") {
        config.server.client_url = client_url;
    }
    if let Some(dir) = lookup("STATIC_DIR") {
        config.server.static_dir = Some(dir);
    }
    if let Some(url) = lookup("DATABASE_URL") {
        config.database.url = url;
    }
    if let Some(key) = lookup("OPENAI_API_KEY") {
        config.ai.api_key = Some(key);
    }
    if let Some(base_url) = lookup("OPENAI_BASE_URL") {
        config.ai.base_url = base_url;
    }
    if let Some(model) = lookup("OPENAI_MODEL") {
        config.ai.model = model;
    }
    if let Some(format) = lookup("LOG_FORMAT") {
        match format.parse() {
            Ok(format) => config.observability.log_format = format,
            Err(e) => tracing::warn!(error = %e, "Ignoring LOG_FORMAT override"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_overrides() {
        let vars = env(&[
            ("OPENAI_API_KEY", "sk-123"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("CLIENT_URL", "https://tester.example.com"),
            ("LOG_FORMAT", "json"),
        ]);
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, |k| vars.get(k).cloned());

        assert_eq!(config.ai.credential(), Some("sk-123"));
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.server.client_url, "https://tester.example.com");
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_port_keeps_host() {
        let vars = env(&[("PORT", "8088")]);
        let mut config = AppConfig::default();
        config.server.bind_address = "127.0.0.1:5000".to_string();
        apply_env_overrides(&mut config, |k| vars.get(k).cloned());
        assert_eq!(config.server.bind_address, "127.0.0.1:8088");
    }

    #[test]
    fn test_bind_address_wins_over_port() {
        let vars = env(&[("PORT", "8088"), ("BIND_ADDRESS", "127.0.0.1:7000")]);
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, |k| vars.get(k).cloned());
        assert_eq!(config.server.bind_address, "127.0.0.1:7000");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
