//! Request history persistence.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use sqlx::sqlite::SqlitePool;

use crate::domain::{HistoryEntry, HttpMethod, Pagination, RecordedResponse};
use crate::store::{from_micros, to_micros, StoreError, StoreResult};

#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    id: String,
    method: String,
    url: String,
    headers: String,
    body: String,
    response_status: i64,
    response_headers: String,
    response_data: Option<String>,
    created_at: i64,
}

impl TryFrom<HistoryRow> for HistoryEntry {
    type Error = StoreError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        let method = row
            .method
            .parse::<HttpMethod>()
            .map_err(|e| StoreError::Corrupt {
                id: row.id.clone(),
                reason: format!("unknown method '{}'", e.0),
            })?;
        let status = u16::try_from(row.response_status).map_err(|_| StoreError::Corrupt {
            id: row.id.clone(),
            reason: format!("status {} out of range", row.response_status),
        })?;
        let headers: BTreeMap<String, String> = serde_json::from_str(&row.headers)?;
        let body: Value = serde_json::from_str(&row.body)?;
        let response_headers: BTreeMap<String, String> =
            serde_json::from_str(&row.response_headers)?;
        let data = row
            .response_data
            .as_deref()
            .map(serde_json::from_str::<Value>)
            .transpose()?;
        let created_at = from_micros(&row.id, row.created_at)?;

        Ok(HistoryEntry {
            id: row.id,
            method,
            url: row.url,
            headers,
            body,
            response: RecordedResponse {
                status,
                headers: response_headers,
                data,
            },
            created_at,
        })
    }
}

/// History table access, with reads limited to the retention window.
#[derive(Clone, Debug)]
pub struct HistoryStore {
    pool: SqlitePool,
    retention: Duration,
}

impl HistoryStore {
    /// Wrap `pool`; reads skip entries older than `retention`.
    pub fn new(pool: SqlitePool, retention: Duration) -> Self {
        Self { pool, retention }
    }

    /// Configured retention window.
    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Oldest live timestamp; a window reaching past the epoch keeps everything.
    fn cutoff(&self, now: DateTime<Utc>) -> i64 {
        now.checked_sub_signed(self.retention)
            .map(to_micros)
            .unwrap_or(0)
            .max(0)
    }

    /// Store a validated entry.
    pub async fn insert(&self, entry: &HistoryEntry) -> StoreResult<()> {
        let headers = serde_json::to_string(&entry.headers)?;
        let body = serde_json::to_string(&entry.body)?;
        let response_headers = serde_json::to_string(&entry.response.headers)?;
        let data = serde_json::to_string(entry.response.data.as_ref().unwrap_or(&Value::Null))?;

        sqlx::query(
            r#"
            INSERT INTO history
                (id, method, url, headers, body, response_status, response_headers, response_data, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&entry.id)
        .bind(entry.method.as_str())
        .bind(&entry.url)
        .bind(headers)
        .bind(body)
        .bind(i64::from(entry.response.status))
        .bind(response_headers)
        .bind(data)
        .bind(to_micros(entry.created_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// One page of entries, newest first, without response bodies.
    /// Returns the page and the total number of live entries.
    pub async fn list(&self, pagination: Pagination) -> StoreResult<(Vec<HistoryEntry>, u64)> {
        let cutoff = self.cutoff(Utc::now());
        let limit = i64::from(pagination.limit);
        let offset = i64::try_from(pagination.offset()).unwrap_or(i64::MAX);

        let rows: Vec<HistoryRow> = sqlx::query_as(
            r#"
            SELECT id, method, url, headers, body, response_status, response_headers,
                   NULL AS response_data, created_at
            FROM history
            WHERE created_at >= $1
            ORDER BY created_at DESC, rowid DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(cutoff)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM history WHERE created_at >= $1")
            .bind(cutoff)
            .fetch_one(&self.pool)
            .await?;

        let entries = rows
            .into_iter()
            .map(HistoryEntry::try_from)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok((entries, u64::try_from(total).unwrap_or_default()))
    }

    /// Full entry, including the response body.
    pub async fn get(&self, id: &str) -> StoreResult<Option<HistoryEntry>> {
        let row: Option<HistoryRow> = sqlx::query_as(
            r#"
            SELECT id, method, url, headers, body, response_status, response_headers,
                   response_data, created_at
            FROM history
            WHERE id = $1 AND created_at >= $2
            "#,
        )
        .bind(id)
        .bind(self.cutoff(Utc::now()))
        .fetch_optional(&self.pool)
        .await?;

        row.map(HistoryEntry::try_from).transpose()
    }

    /// Returns whether an entry was removed.
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM history WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every entry. Returns how many were removed.
    pub async fn clear(&self) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM history").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Remove entries created before `now - retention`.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM history WHERE created_at < $1")
            .bind(self.cutoff(now))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
