use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use super::parse_json;
use crate::db::Store;
use crate::dto::{BoardView, CreateColumnDto, UpdateColumnDto};
use crate::errors::ApiError;
use crate::repo;

/// Handler for appending a column
///
/// This function handles POST requests to `/boards/{project_id}/columns`.
#[instrument(skip(store, payload))]
pub async fn add_column_handler(
    State(store): State<Arc<Store>>,
    Path(project_id): Path<String>,
    payload: Result<Json<CreateColumnDto>, JsonRejection>,
) -> Result<Json<BoardView>, ApiError> {
    let dto = parse_json(payload)?;
    let board = repo::add_column(&store, &project_id, &dto).await?;
    Ok(Json(board))
}

/// Handler for renaming or recoloring a column
///
/// This function handles PUT requests to `/boards/{project_id}/columns/{column_id}`.
#[instrument(skip(store, payload))]
pub async fn update_column_handler(
    State(store): State<Arc<Store>>,
    Path((project_id, column_id)): Path<(String, String)>,
    payload: Result<Json<UpdateColumnDto>, JsonRejection>,
) -> Result<Json<BoardView>, ApiError> {
    let dto = parse_json(payload)?;
    let board = repo::update_column(&store, &project_id, &column_id, &dto).await?;
    Ok(Json(board))
}

/// Handler for deleting a column and its cards
///
/// This function handles DELETE requests to `/boards/{project_id}/columns/{column_id}`.
#[instrument(skip(store))]
pub async fn delete_column_handler(
    State(store): State<Arc<Store>>,
    Path((project_id, column_id)): Path<(String, String)>,
) -> Result<Json<BoardView>, ApiError> {
    let board = repo::delete_column(&store, &project_id, &column_id).await?;
    Ok(Json(board))
}
