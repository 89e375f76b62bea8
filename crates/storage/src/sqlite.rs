use crate::{KeyValueStore, StorageError};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// SQLite-backed key-value store over the `kv_entries` table.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn new(connection_string: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(connection_string)?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        tracing::debug!("Running migrations...");
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await?;
        tracing::debug!("Migrations complete.");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value: Option<String> = sqlx::query_scalar(
            "SELECT value FROM kv_entries WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO kv_entries (key, value) VALUES ($1, $2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_values_survive_reconnect() {
        let db_path = std::env::temp_dir().join(format!(
            "test_cards_reconnect_{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&db_path);
        let connection_string = format!("sqlite:{}", db_path.display());

        let store = SqliteStore::new(&connection_string).await.unwrap();
        store.run_migrations().await.unwrap();
        store.set("@cards", "[{\"id\":\"1\"}]").await.unwrap();
        store.pool.close().await;

        let reopened = SqliteStore::new(&connection_string).await.unwrap();
        reopened.run_migrations().await.unwrap();
        assert_eq!(
            reopened.get("@cards").await.unwrap().as_deref(),
            Some("[{\"id\":\"1\"}]")
        );
    }
}
