//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! validated documents (domain)
//!     → history.rs / collections.rs (row mapping, JSON-encoded nested fields)
//!     → SQLite via sqlx pool
//!
//! retention.rs:
//!     periodic timer → HistoryStore::purge_expired
//! ```
//!
//! # Design Decisions
//! - One row per document; nested maps and lists are stored as JSON text
//! - Every write touches exactly one row
//! - Timestamps are stored as UTC microseconds for ordering

pub mod collections;
pub mod history;
pub mod retention;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

use crate::config::DatabaseConfig;

pub use collections::CollectionStore;
pub use history::HistoryStore;
pub use retention::RetentionSweeper;

/// Errors raised by the store layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Document encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Corrupt row {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS history (
        id TEXT PRIMARY KEY NOT NULL,
        method TEXT NOT NULL,
        url TEXT NOT NULL,
        headers TEXT NOT NULL,
        body TEXT NOT NULL,
        response_status INTEGER NOT NULL,
        response_headers TEXT NOT NULL,
        response_data TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_history_created_at ON history (created_at DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS collections (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        requests TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_collections_updated_at ON collections (updated_at DESC)",
];

/// Handle to the document store. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
    history: HistoryStore,
    collections: CollectionStore,
}

impl Store {
    /// Open the pool and create tables that do not exist yet.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
        if is_in_memory(&config.url) {
            // Each in-memory connection is its own database; pin a single one for the pool's lifetime.
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool_options.connect_with(options).await?;

        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }

        tracing::info!(
            url = %config.url,
            retention_secs = config.history_retention_secs,
            "Document store ready"
        );

        let retention = retention_window(config.history_retention_secs);
        Ok(Self {
            history: HistoryStore::new(pool.clone(), retention),
            collections: CollectionStore::new(pool.clone()),
            pool,
        })
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn collections(&self) -> &CollectionStore {
        &self.collections
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Retention as a signed duration, saturating at the longest representable window.
fn retention_window(secs: u64) -> chrono::Duration {
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .unwrap_or(chrono::Duration::MAX)
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

pub(crate) fn to_micros(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_micros()
}

pub(crate) fn from_micros(id: &str, micros: i64) -> StoreResult<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros).ok_or_else(|| StoreError::Corrupt {
        id: id.to_string(),
        reason: format!("timestamp {} out of range", micros),
    })
}

#[cfg(test)]
pub(crate) async fn memory_store() -> Store {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        ..DatabaseConfig::default()
    };
    Store::connect(&config).await.unwrap()
}
