pub mod handler;
pub mod models;
pub mod repository;
pub mod scan;
pub mod service;

pub use models::{BarcodeType, Card, CardForm};
pub use repository::{CardStore, CardStoreError, CARDS_KEY};
