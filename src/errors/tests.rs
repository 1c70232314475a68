use super::*;
use axum::body::to_bytes;
use axum::response::IntoResponse;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind};

/// Helper to extract status code and body JSON from an ApiError response
async fn error_response(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

/// Minimal database error payload for building diesel errors by hand
#[derive(Debug)]
struct FakeDbError(&'static str);

impl DatabaseErrorInformation for FakeDbError {
    fn message(&self) -> &str {
        self.0
    }
    fn details(&self) -> Option<&str> {
        None
    }
    fn hint(&self) -> Option<&str> {
        None
    }
    fn table_name(&self) -> Option<&str> {
        None
    }
    fn column_name(&self) -> Option<&str> {
        None
    }
    fn constraint_name(&self) -> Option<&str> {
        None
    }
    fn statement_position(&self) -> Option<i32> {
        None
    }
}

fn db_error(message: &'static str) -> StoreError {
    StoreError::Database(diesel::result::Error::DatabaseError(
        DatabaseErrorKind::Unknown,
        Box::new(FakeDbError(message)),
    ))
}

#[tokio::test]
async fn test_internal_error_response_hides_details() {
    let error = ApiError::Internal(anyhow::anyhow!("connection refused"));
    let (status, body) = error_response(error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_not_found_response() {
    let error = ApiError::from(StoreError::not_found("Card", "abc"));
    let (status, body) = error_response(error).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Card abc not found");
}

#[tokio::test]
async fn test_validation_response() {
    let error = ApiError::from(StoreError::Validation("Title is required".to_string()));
    let (status, body) = error_response(error).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Title is required");
}

#[tokio::test]
async fn test_conflict_response() {
    let error = ApiError::from(StoreError::Conflict("Board is busy".to_string()));
    let (status, body) = error_response(error).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Board is busy");
}

#[tokio::test]
async fn test_database_error_maps_to_internal() {
    let error = ApiError::from(db_error("disk I/O error"));
    let (status, body) = error_response(error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

#[test]
fn test_lock_errors_are_transient() {
    assert!(db_error("database is locked").is_transient());
    assert!(db_error("database table is locked: cards").is_transient());
    assert!(!db_error("UNIQUE constraint failed: users.email").is_transient());
    assert!(!StoreError::Validation("locked".to_string()).is_transient());
    assert!(!StoreError::Database(diesel::result::Error::NotFound).is_transient());
}
