//! Collection persistence. Each collection is one row; its saved requests
//! live in a JSON array column and are rewritten with the parent.

use sqlx::sqlite::SqlitePool;

use crate::domain::{Collection, SavedRequest};
use crate::store::{from_micros, to_micros, StoreResult};

#[derive(Debug, sqlx::FromRow)]
struct CollectionRow {
    id: String,
    name: String,
    description: String,
    requests: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<CollectionRow> for Collection {
    type Error = crate::store::StoreError;

    fn try_from(row: CollectionRow) -> Result<Self, Self::Error> {
        let requests: Vec<SavedRequest> = serde_json::from_str(&row.requests)?;
        let created_at = from_micros(&row.id, row.created_at)?;
        let updated_at = from_micros(&row.id, row.updated_at)?;
        Ok(Collection {
            id: row.id,
            name: row.name,
            description: row.description,
            requests,
            created_at,
            updated_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct CollectionStore {
    pool: SqlitePool,
}

impl CollectionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All collections, most recently updated first.
    pub async fn list(&self) -> StoreResult<Vec<Collection>> {
        let rows: Vec<CollectionRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, requests, created_at, updated_at
            FROM collections
            ORDER BY updated_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Collection::try_from).collect()
    }

    /// Look up one collection by id.
    pub async fn get(&self, id: &str) -> StoreResult<Option<Collection>> {
        let row: Option<CollectionRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, requests, created_at, updated_at
            FROM collections
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Collection::try_from).transpose()
    }

    /// Store a new collection document.
    pub async fn insert(&self, collection: &Collection) -> StoreResult<()> {
        let requests = serde_json::to_string(&collection.requests)?;
        sqlx::query(
            r#"
            INSERT INTO collections (id, name, description, requests, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&collection.id)
        .bind(&collection.name)
        .bind(&collection.description)
        .bind(requests)
        .bind(to_micros(collection.created_at))
        .bind(to_micros(collection.updated_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Rewrite an existing document. Returns false when the id is unknown.
    pub async fn save(&self, collection: &Collection) -> StoreResult<bool> {
        let requests = serde_json::to_string(&collection.requests)?;
        let result = sqlx::query(
            r#"
            UPDATE collections
            SET name = $2, description = $3, requests = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(&collection.id)
        .bind(&collection.name)
        .bind(&collection.description)
        .bind(requests)
        .bind(to_micros(collection.updated_at))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns whether a collection was removed.
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CollectionInput, SavedRequestInput};
    use crate::store::memory_store;
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn collection(name: &str) -> Collection {
        let fields = CollectionInput {
            name: Some(name.to_string()),
            description: Some("smoke checks".to_string()),
            requests: None,
        }
        .validate()
        .unwrap();
        Collection::new(fields, crate::domain::timestamp())
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = memory_store().await;
        let c = collection("Smoke");
        store.collections().insert(&c).await.unwrap();

        let loaded = store.collections().get(&c.id).await.unwrap().unwrap();
        assert_eq!(loaded, c);
        assert!(store.collections().get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_rewrites_embedded_requests() {
        let store = memory_store().await;
        let mut c = collection("Smoke");
        store.collections().insert(&c).await.unwrap();

        let saved = SavedRequestInput {
            name: Some("create user".to_string()),
            method: Some("POST".to_string()),
            url: Some("https://example.com/users".to_string()),
            body: Some(json!({"name": "ada"})),
            ..Default::default()
        }
        .validate()
        .unwrap();
        c.push_request(saved.clone(), crate::domain::timestamp());
        assert!(store.collections().save(&c).await.unwrap());

        let loaded = store.collections().get(&c.id).await.unwrap().unwrap();
        assert_eq!(loaded.requests, vec![saved]);
        assert_eq!(loaded.updated_at, c.updated_at);
    }

    #[tokio::test]
    async fn test_save_unknown_id() {
        let store = memory_store().await;
        let c = collection("Ghost");
        assert!(!store.collections().save(&c).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_orders_by_updated_at() {
        let store = memory_store().await;
        let mut older = collection("older");
        let newer = collection("newer");
        store.collections().insert(&older).await.unwrap();
        store.collections().insert(&newer).await.unwrap();

        older.touch(Utc::now() + Duration::seconds(10));
        store.collections().save(&older).await.unwrap();

        let names: Vec<_> = store
            .collections()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["older", "newer"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = memory_store().await;
        let c = collection("Smoke");
        store.collections().insert(&c).await.unwrap();
        assert!(store.collections().delete(&c.id).await.unwrap());
        assert!(!store.collections().delete(&c.id).await.unwrap());
    }
}
