use crate::models::{Card, CardDetail, CardForm};
use crate::scan::{ScanResult, ScannedBarcode};
use crate::service::{CardError, CardService};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use common::AppState;
use std::sync::Arc;
use serde_json::json;

impl IntoResponse for CardError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            CardError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            CardError::NotFound => (StatusCode::NOT_FOUND, "Card not found".to_string()),
            CardError::Infrastructure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

pub fn cards_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_cards).post(create_card))
        .route("/scan", post(classify_scan))
        .route("/{id}", get(card_detail).put(update_card).delete(delete_card))
        .with_state(state)
}

async fn list_cards(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<Card>> {
    Json(CardService::list_cards(&state.storage).await)
}

async fn create_card(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CardForm>,
) -> Result<impl IntoResponse, CardError> {
    let card = CardService::create_card(&state.storage, payload).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

async fn card_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CardDetail>, CardError> {
    let detail = CardService::card_detail(&state.storage, &id).await?;
    Ok(Json(detail))
}

async fn update_card(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<CardForm>,
) -> Result<Json<Card>, CardError> {
    let card = CardService::update_card(&state.storage, &id, payload).await?;
    Ok(Json(card))
}

async fn delete_card(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, CardError> {
    CardService::delete_card(&state.storage, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn classify_scan(
    Json(payload): Json<ScanResult>,
) -> Result<Json<ScannedBarcode>, CardError> {
    Ok(Json(CardService::classify_scan(payload)?))
}
