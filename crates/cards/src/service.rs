use crate::models::{Card, CardDetail, CardForm};
use crate::repository::{CardStore, CardStoreError};
use crate::scan::{ScanResult, ScannedBarcode};
use storage::Storage;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage error: {0}")]
    Infrastructure(String),
    #[error("Card not found")]
    NotFound,
}

impl From<CardStoreError> for CardError {
    fn from(err: CardStoreError) -> Self {
        CardError::Infrastructure(err.to_string())
    }
}

pub struct CardService;

impl CardService {
    #[instrument(skip(storage))]
    pub async fn list_cards(storage: &Storage) -> Vec<Card> {
        CardStore::new(storage.clone()).fetch_all().await
    }

    #[instrument(skip(storage))]
    pub async fn get_card(storage: &Storage, id: &str) -> Result<Card, CardError> {
        CardStore::new(storage.clone())
            .fetch_by_id(id)
            .await
            .ok_or(CardError::NotFound)
    }

    #[instrument(skip(storage))]
    pub async fn card_detail(storage: &Storage, id: &str) -> Result<CardDetail, CardError> {
        Ok(Self::get_card(storage, id).await?.into())
    }

    #[instrument(skip(storage))]
    pub async fn create_card(storage: &Storage, form: CardForm) -> Result<Card, CardError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp_millis();
        let card = form
            .into_card(id, created_at)
            .map_err(CardError::InvalidInput)?;

        CardStore::new(storage.clone()).create(&card).await?;
        tracing::info!(card_id = %card.id, "Card saved");
        Ok(card)
    }

    #[instrument(skip(storage))]
    pub async fn update_card(
        storage: &Storage,
        id: &str,
        form: CardForm,
    ) -> Result<Card, CardError> {
        let store = CardStore::new(storage.clone());
        let original = store.fetch_by_id(id).await.ok_or(CardError::NotFound)?;

        let card = form
            .into_card(original.id, original.created_at)
            .map_err(CardError::InvalidInput)?;

        // The card may have been deleted since it was read above.
        if !store.update_existing(&card).await? {
            return Err(CardError::NotFound);
        }
        Ok(card)
    }

    #[instrument(skip(storage))]
    pub async fn delete_card(storage: &Storage, id: &str) -> Result<(), CardError> {
        CardStore::new(storage.clone()).remove(id).await?;
        Ok(())
    }

    #[instrument]
    pub fn classify_scan(scan: ScanResult) -> Result<ScannedBarcode, CardError> {
        scan.classify().map_err(CardError::InvalidInput)
    }
}
