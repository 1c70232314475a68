use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use super::parse_json;
use crate::db::Store;
use crate::dto::CreateUserDto;
use crate::errors::ApiError;
use crate::models::User;
use crate::repo;

/// Handler for creating a user
///
/// This function handles POST requests to `/users`.
#[instrument(skip(store, payload))]
pub async fn create_user_handler(
    State(store): State<Arc<Store>>,
    payload: Result<Json<CreateUserDto>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let dto = parse_json(payload)?;
    let user = repo::create_user(&store, &dto).await?;
    Ok(Json(user))
}

/// Handler for listing users
///
/// This function handles GET requests to `/users`.
#[instrument(skip(store))]
pub async fn list_users_handler(
    State(store): State<Arc<Store>>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = repo::list_users(&store).await?;
    Ok(Json(users))
}

/// Handler for fetching a single user
///
/// This function handles GET requests to `/users/{user_id}`.
#[instrument(skip(store))]
pub async fn get_user_handler(
    State(store): State<Arc<Store>>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    match repo::get_user(&store, &user_id).await? {
        Some(user) => Ok(Json(user)),
        None => Err(ApiError::NotFound(format!("User {} not found", user_id))),
    }
}
