use clap::{Parser, ValueEnum};
use storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    /// Persist to the SQLite database at `--database-url`.
    Sqlite,
    /// Keep everything in process memory.
    Memory,
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:cards.db")]
    pub database_url: String,

    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    #[arg(long, env = "STORAGE_BACKEND", value_enum, default_value_t = StorageBackend::Sqlite)]
    pub storage_backend: StorageBackend,
}

impl Config {
    pub async fn open_storage(&self) -> Result<Storage, storage::StorageError> {
        match self.storage_backend {
            StorageBackend::Sqlite => Storage::connect_sqlite(&self.database_url).await,
            StorageBackend::Memory => Ok(Storage::in_memory()),
        }
    }
}
