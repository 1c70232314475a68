/// TeamFlow: A Kanban Board Service Library
///
/// This library provides the board backend of the TeamFlow project tool:
/// data models, the position index that keeps cards and columns densely
/// ordered, transactional storage access, and a web API.
///
/// ### Modules
///
/// - `db`: Connection pool and the transactional `Store` handle
/// - `models`: Boards, columns, cards, labels, assignees and users
/// - `repo`: Board operations, including the atomic card move
/// - `schema`: Database schema definitions
///
/// ### Web API
///
/// The library exposes a RESTful API using Axum with the following endpoints:
///
/// - `GET /boards/{project_id}`: Load the board of a project, creating it on first access
/// - `POST /boards/{project_id}/move-card`: Move a card within or across columns
/// - `POST /boards/{project_id}/move-column`: Reorder a column
/// - `POST /boards/{project_id}/columns`: Append a column
/// - `PUT|DELETE /boards/{project_id}/columns/{column_id}`: Edit or delete a column
/// - `POST /boards/{project_id}/columns/{column_id}/cards`: Append a card
/// - `PUT|DELETE /boards/{project_id}/columns/{column_id}/cards/{card_id}`: Edit or delete a card
/// - `POST|GET /users`: Create or list users
/// - `GET /users/{user_id}`: Fetch one user
///
/// Every board endpoint answers with the full board aggregate.

/// Configuration loading
pub mod config;

/// Database connection module
pub mod db;

/// Request and response bodies
pub mod dto;

/// Error types and their HTTP mapping
pub mod errors;

/// HTTP handlers
pub mod handlers;

/// Data models module
pub mod models;

/// Repository module for database operations
pub mod repo;

/// Database schema module
pub mod schema;

#[cfg(test)]
mod test_utils;

use axum::{
    routing::{get, post, put},
    Router,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::db::Store;
use crate::handlers::*;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Creates the application router with all routes
///
/// ### Arguments
///
/// * `store` - The storage handle shared with all handlers
///
/// ### Returns
///
/// An Axum Router configured with all routes, a permissive CORS layer for
/// the browser client, and the store as state
pub fn create_app(store: Arc<Store>) -> Router {
    Router::new()
        .route("/boards/{project_id}", get(get_board_handler))
        .route("/boards/{project_id}/move-card", post(move_card_handler))
        .route("/boards/{project_id}/move-column", post(move_column_handler))
        .route("/boards/{project_id}/columns", post(add_column_handler))
        .route(
            "/boards/{project_id}/columns/{column_id}",
            put(update_column_handler).delete(delete_column_handler),
        )
        .route("/boards/{project_id}/columns/{column_id}/cards", post(add_card_handler))
        .route(
            "/boards/{project_id}/columns/{column_id}/cards/{card_id}",
            put(update_card_handler).delete(delete_card_handler),
        )
        .route("/users", post(create_user_handler).get(list_users_handler))
        .route("/users/{user_id}", get(get_user_handler))
        .layer(CorsLayer::permissive())
        .with_state(store)
}

/// Runs the embedded migrations
///
/// This function applies all pending database migrations to set up the schema.
pub fn run_migrations(conn: &mut diesel::SqliteConnection) -> anyhow::Result<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| anyhow::anyhow!("Failed to run migrations: {}", err))?;
    tracing::info!("Applied {} migrations", applied.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::test_utils::setup_test_db;

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn test_run_migrations_is_idempotent() {
        let store = setup_test_db();
        let mut conn = store.pool().get().unwrap();
        assert!(run_migrations(&mut conn).is_ok());
    }

    #[tokio::test]
    async fn test_get_board_route() {
        let app = create_app(setup_test_db());

        let response = app
            .oneshot(Request::builder().uri("/boards/demo").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["projectId"], "demo");
        assert_eq!(body["columns"].as_array().unwrap().len(), 4);
        assert!(body.get("_id").is_none());
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = create_app(setup_test_db());

        let response = app
            .oneshot(Request::builder().uri("/items").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_preflight_is_answered() {
        let app = create_app(setup_test_db());

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/boards/demo/move-card")
                    .header("Origin", "http://localhost:5173")
                    .header("Access-Control-Request-Method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("access-control-allow-origin"));
    }
}
