//! Web API Handlers
//!
//! This module contains the handlers for the RESTful API endpoints.
//! Each handler extracts the path and body, calls the matching repository
//! operation with the shared store, and returns the board aggregate (or the
//! user records) as JSON.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::errors::ApiError;

mod board_handlers;
mod column_handlers;
mod card_handlers;
mod user_handlers;

// Re-export all handlers
pub use board_handlers::*;
pub use column_handlers::*;
pub use card_handlers::*;
pub use user_handlers::*;

/// Unwraps a JSON body, reporting malformed input as a validation error
///
/// Axum rejects bodies that fail to deserialize (missing title, non-integer
/// position, unknown priority) with its own status codes; the API reports all
/// of them as 400 with the usual `{"error": ...}` body.
fn parse_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}
