//! Card Store: the single persisted card collection.
//!
//! The whole collection lives as one JSON array under [`CARDS_KEY`]. Every
//! operation reads the full value, and every write re-serializes and stores
//! the full value. Writes run inside a [`storage::UnitOfWork`], so writes
//! through clones of one [`Storage`] handle never interleave. Separate
//! processes sharing a database still race: last write wins on the whole
//! collection.

use crate::models::Card;
use storage::{Storage, StorageError};

pub const CARDS_KEY: &str = "@cards";

#[derive(Debug, thiserror::Error)]
pub enum CardStoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Card collection encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct CardStore {
    storage: Storage,
}

fn decode(value: Option<String>) -> Result<Vec<Card>, CardStoreError> {
    match value {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

impl CardStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Reads the collection, reporting storage and decoding failures.
    pub async fn try_fetch_all(&self) -> Result<Vec<Card>, CardStoreError> {
        decode(self.storage.get(CARDS_KEY).await?)
    }

    /// Reads the collection. Failures are logged and read as an empty list.
    pub async fn fetch_all(&self) -> Vec<Card> {
        match self.try_fetch_all().await {
            Ok(cards) => cards,
            Err(e) => {
                tracing::error!(error = %e, "Error loading cards");
                Vec::new()
            }
        }
    }

    pub async fn fetch_by_id(&self, id: &str) -> Option<Card> {
        self.fetch_all().await.into_iter().find(|c| c.id == id)
    }

    /// Appends `card`. Ids are not checked for uniqueness.
    pub async fn create(&self, card: &Card) -> Result<(), CardStoreError> {
        self.rewrite(|cards| cards.push(card.clone()))
            .await
            .inspect_err(|e| tracing::error!(error = %e, card_id = %card.id, "Error saving card"))
    }

    /// Replaces every card whose id matches `card.id`.
    pub async fn update(&self, card: &Card) -> Result<(), CardStoreError> {
        self.update_existing(card).await.map(|_| ())
    }

    /// Like [`CardStore::update`], but reports whether any card matched.
    /// The check and the write happen in one unit of work.
    pub async fn update_existing(&self, card: &Card) -> Result<bool, CardStoreError> {
        self.rewrite(|cards| {
            let mut matched = false;
            for existing in cards.iter_mut().filter(|c| c.id == card.id) {
                *existing = card.clone();
                matched = true;
            }
            matched
        })
        .await
        .inspect_err(|e| tracing::error!(error = %e, card_id = %card.id, "Error updating card"))
    }

    /// Drops every card with the given id. Unknown ids are a no-op write.
    pub async fn remove(&self, id: &str) -> Result<(), CardStoreError> {
        self.rewrite(|cards| cards.retain(|c| c.id != id))
            .await
            .inspect_err(|e| tracing::error!(error = %e, card_id = %id, "Error deleting card"))
    }

    // An unreadable collection aborts the write rather than being replaced.
    async fn rewrite<F, T>(&self, apply: F) -> Result<T, CardStoreError>
    where
        F: FnOnce(&mut Vec<Card>) -> T,
    {
        let mut uow = self.storage.begin().await;
        let mut cards = decode(uow.get(CARDS_KEY).await?)?;
        let outcome = apply(&mut cards);
        let json = serde_json::to_string(&cards)?;
        uow.set(CARDS_KEY, &json).await?;
        Ok(outcome)
    }
}
