use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, MutexGuard};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

static TEST_DB_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Infrastructure(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Asynchronous string key-value primitive. Values are opaque to the store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Cloneable handle over a key-value backend.
///
/// All clones share one write guard, so read-modify-write cycles started
/// through [`Storage::begin`] never interleave within a process.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueStore>,
    write_guard: Arc<Mutex<()>>,
}

impl Storage {
    pub fn new<S: KeyValueStore + 'static>(backend: S) -> Self {
        Self {
            backend: Arc::new(backend),
            write_guard: Arc::new(Mutex::new(())),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Opens (creating if needed) a SQLite database and applies migrations.
    pub async fn connect_sqlite(connection_string: &str) -> Result<Self, StorageError> {
        let store = SqliteStore::new(connection_string).await?;
        store.run_migrations().await?;
        Ok(Self::new(store))
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.backend.get(key).await
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.backend.set(key, value).await
    }

    pub async fn begin(&self) -> UnitOfWork<'_> {
        let guard = self.write_guard.lock().await;
        UnitOfWork {
            backend: self.backend.as_ref(),
            _guard: guard,
        }
    }
}

/// Exclusive read-modify-write scope. The write guard is released on drop.
pub struct UnitOfWork<'a> {
    backend: &'a dyn KeyValueStore,
    _guard: MutexGuard<'a, ()>,
}

impl<'a> UnitOfWork<'a> {
    pub async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.backend.get(key).await
    }

    pub async fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.backend.set(key, value).await
    }
}

// do not add #[cfg(test)] here because it hides this method from libraries.
pub async fn get_test_storage() -> Storage {
    use std::time::{SystemTime, UNIX_EPOCH};

    // Each test gets its own database file in the temp directory
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let n = TEST_DB_COUNTER.fetch_add(1, Ordering::SeqCst);
    let db_path = std::env::temp_dir().join(format!("test_cards_{}_{}.db", now, n));
    let connection_string = format!("sqlite:{}", db_path.display());

    Storage::connect_sqlite(&connection_string)
        .await
        .expect("Failed to create test storage")
}
