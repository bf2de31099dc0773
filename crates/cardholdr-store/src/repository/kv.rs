//! # SQLite Key-Value Repository
//!
//! Durable [`KeyValueStore`] backed by the `kv_store` table.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  set("cardholdr_cards", "[{...},{...}]")                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT ... ON CONFLICT(key) DO UPDATE   ← single statement, atomic    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────┬──────────────────────┬──────────────────────┐   │
//! │  │ key               │ value                │ updated_at           │   │
//! │  ├───────────────────┼──────────────────────┼──────────────────────┤   │
//! │  │ cardholdr_cards   │ [{...},{...}]        │ 2026-10-18T09:12:... │   │
//! │  │ cardholdr_init... │ true                 │ 2026-10-01T17:40:... │   │
//! │  └───────────────────┴──────────────────────┴──────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;
use crate::kv::KeyValueStore;

/// Repository for the `kv_store` table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a new SqliteStore.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStore { pool }
    }

    /// Lists stored keys (for diagnostics).
    pub async fn keys(&self) -> StoreResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        debug!(key = %key, found = value.is_some(), "Read key");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing key");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        debug!(key = %key, "Removing key");

        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_sqlite_store_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.kv_store();

        assert_eq!(store.get("cardholdr_cards").await.unwrap(), None);

        store.set("cardholdr_cards", "[]").await.unwrap();
        store.set("cardholdr_cards", r#"[{"id":"1"}]"#).await.unwrap();
        assert_eq!(
            store.get("cardholdr_cards").await.unwrap().as_deref(),
            Some(r#"[{"id":"1"}]"#)
        );
        assert_eq!(store.keys().await.unwrap(), vec!["cardholdr_cards"]);

        store.remove("cardholdr_cards").await.unwrap();
        assert_eq!(store.get("cardholdr_cards").await.unwrap(), None);
    }
}
