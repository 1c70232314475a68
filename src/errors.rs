use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json
};
use thiserror::Error;
use tracing::error;

/// Errors raised by the store and the board operations built on it
///
/// Every operation is pass/fail: when one of these is returned the enclosing
/// transaction has been rolled back and nothing was written.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A board, column, card or user does not exist, or does not belong to the stated parent
    #[error("{0}")]
    NotFound(String),
    /// The request was malformed (empty title, negative position, ...)
    #[error("{0}")]
    Validation(String),
    /// A concurrent writer kept the database locked past the retry budget
    #[error("{0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("Connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("Database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl StoreError {
    /// Returns true for lock contention errors that are worth re-attempting
    ///
    /// SQLite reports contention as `SQLITE_BUSY` ("database is locked") for
    /// separate connections and `SQLITE_LOCKED` ("database table is locked")
    /// for shared-cache connections; diesel surfaces both as unknown database errors.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Database(diesel::result::Error::DatabaseError(_, info)) => {
                let message = info.message();
                message.contains("locked") || message.contains("busy")
            }
            _ => false,
        }
    }

    /// Shorthand for a not-found error with a formatted message
    pub fn not_found(what: &str, id: &str) -> Self {
        StoreError::NotFound(format!("{} {} not found", what, id))
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => ApiError::NotFound(msg),
            StoreError::Validation(msg) => ApiError::Validation(msg),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            other => ApiError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Internal(err) => {
                error!("Internal error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests;
