use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::parse_json;
use crate::db::Store;
use crate::dto::{BoardView, CreateCardDto, UpdateCardDto};
use crate::errors::ApiError;
use crate::repo;

/// Handler for appending a card to a column
///
/// This function handles POST requests to
/// `/boards/{project_id}/columns/{column_id}/cards`.
///
/// ### Returns
///
/// The reloaded board aggregate
#[instrument(skip(store, payload))]
pub async fn add_card_handler(
    State(store): State<Arc<Store>>,
    Path((project_id, column_id)): Path<(String, String)>,
    payload: Result<Json<CreateCardDto>, JsonRejection>,
) -> Result<Json<BoardView>, ApiError> {
    let dto = parse_json(payload)?;
    info!("Creating card in column {}", column_id);
    let board = repo::add_card(&store, &project_id, &column_id, &dto).await?;
    Ok(Json(board))
}

/// Handler for editing a card
///
/// This function handles PUT requests to
/// `/boards/{project_id}/columns/{column_id}/cards/{card_id}`.
#[instrument(skip(store, payload))]
pub async fn update_card_handler(
    State(store): State<Arc<Store>>,
    Path((project_id, column_id, card_id)): Path<(String, String, String)>,
    payload: Result<Json<UpdateCardDto>, JsonRejection>,
) -> Result<Json<BoardView>, ApiError> {
    let dto = parse_json(payload)?;
    let board = repo::update_card(&store, &project_id, &column_id, &card_id, &dto).await?;
    Ok(Json(board))
}

/// Handler for deleting a card
///
/// This function handles DELETE requests to
/// `/boards/{project_id}/columns/{column_id}/cards/{card_id}`.
#[instrument(skip(store))]
pub async fn delete_card_handler(
    State(store): State<Arc<Store>>,
    Path((project_id, column_id, card_id)): Path<(String, String, String)>,
) -> Result<Json<BoardView>, ApiError> {
    let board = repo::delete_card(&store, &project_id, &column_id, &card_id).await?;
    Ok(Json(board))
}
