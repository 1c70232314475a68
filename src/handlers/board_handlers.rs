use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::parse_json;
use crate::db::Store;
use crate::dto::{BoardView, MoveCardDto, MoveColumnDto};
use crate::errors::ApiError;
use crate::repo;

/// Handler for loading the board of a project
///
/// This function handles GET requests to `/boards/{project_id}`. A project
/// without a board gets the default board on first access.
#[instrument(skip(store))]
pub async fn get_board_handler(
    State(store): State<Arc<Store>>,
    Path(project_id): Path<String>,
) -> Result<Json<BoardView>, ApiError> {
    let board = repo::get_or_create_board(&store, &project_id).await?;
    debug!("Returning board {} with {} columns", board.id, board.columns.len());
    Ok(Json(board))
}

/// Handler for relocating a card
///
/// This function handles POST requests to `/boards/{project_id}/move-card`.
///
/// ### Returns
///
/// The reloaded board aggregate
#[instrument(skip(store, payload))]
pub async fn move_card_handler(
    State(store): State<Arc<Store>>,
    Path(project_id): Path<String>,
    payload: Result<Json<MoveCardDto>, JsonRejection>,
) -> Result<Json<BoardView>, ApiError> {
    let dto = parse_json(payload)?;
    let board = repo::move_card(&store, &project_id, &dto).await?;
    Ok(Json(board))
}

/// Handler for reordering a column
///
/// This function handles POST requests to `/boards/{project_id}/move-column`.
#[instrument(skip(store, payload))]
pub async fn move_column_handler(
    State(store): State<Arc<Store>>,
    Path(project_id): Path<String>,
    payload: Result<Json<MoveColumnDto>, JsonRejection>,
) -> Result<Json<BoardView>, ApiError> {
    let dto = parse_json(payload)?;
    let board = repo::move_column(&store, &project_id, &dto).await?;
    Ok(Json(board))
}
