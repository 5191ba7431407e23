//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, pool size > 0)
//! - Check that addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

/// Longest accepted history retention window (100 years).
pub const MAX_HISTORY_RETENTION_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: '{value}' is not a valid URL")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{field} must be at most {max}")]
    TooLarge { field: &'static str, max: u64 },

    #[error("database.url must not be empty")]
    EmptyDatabaseUrl,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }
    if url::Url::parse(&config.server.client_url).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "server.client_url",
            value: config.server.client_url.clone(),
        });
    }
    if config.server.max_body_size == 0 {
        errors.push(ValidationError::Zero("server.max_body_size"));
    }

    if config.database.url.trim().is_empty() {
        errors.push(ValidationError::EmptyDatabaseUrl);
    }
    if config.database.max_connections == 0 {
        errors.push(ValidationError::Zero("database.max_connections"));
    }
    if config.database.history_retention_secs == 0 {
        errors.push(ValidationError::Zero("database.history_retention_secs"));
    } else if config.database.history_retention_secs > MAX_HISTORY_RETENTION_SECS {
        errors.push(ValidationError::TooLarge {
            field: "database.history_retention_secs",
            max: MAX_HISTORY_RETENTION_SECS,
        });
    }
    if config.database.purge_interval_secs == 0 {
        errors.push(ValidationError::Zero("database.purge_interval_secs"));
    }

    if config.relay.timeout_secs == 0 {
        errors.push(ValidationError::Zero("relay.timeout_secs"));
    }
    if config.relay.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero("relay.connect_timeout_secs"));
    }

    if url::Url::parse(&config.ai.base_url).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "ai.base_url",
            value: config.ai.base_url.clone(),
        });
    }
    if config.ai.timeout_secs == 0 {
        errors.push(ValidationError::Zero("ai.timeout_secs"));
    }
    if config.ai.documentation_max_tokens == 0 {
        errors.push(ValidationError::Zero("ai.documentation_max_tokens"));
    }
    if config.ai.explanation_max_tokens == 0 {
        errors.push(ValidationError::Zero("ai.explanation_max_tokens"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
