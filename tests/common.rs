#![allow(dead_code)]
/// Common test utilities for TeamFlow integration tests
///
/// This file contains shared functions for all integration tests: test
/// application setup, request helpers, and lookups into the board JSON.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use teamflow::{
    create_app,
    db::{init_pool, RetryConfig, Store},
};
use tower::ServiceExt;

/// Creates a test application backed by its own in-memory SQLite database
///
/// The database is a uniquely named shared-cache in-memory database, so all
/// pooled connections see the same schema while tests stay isolated.
pub fn create_test_app() -> Router {
    let database_url = format!("file:it_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let pool = init_pool(&database_url).unwrap();

    let conn = &mut pool.get().unwrap();
    teamflow::run_migrations(conn).unwrap();

    create_app(Arc::new(Store::new(pool, RetryConfig::default())))
}

/// Sends a request and returns the status with the parsed JSON body
///
/// An empty body parses as `Value::Null`.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Sends a raw body with a JSON content type
pub async fn send_raw(app: &Router, method: &str, uri: &str, body: &str) -> StatusCode {
    let request = Request::builder()
        .uri(uri)
        .method(method)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

/// Loads the board of a project, asserting success
pub async fn get_board(app: &Router, project: &str) -> Value {
    let (status, board) = send(app, "GET", &format!("/boards/{}", project), None).await;
    assert_eq!(status, StatusCode::OK, "GET board failed: {}", board);
    board
}

/// Finds a column object by title
pub fn column<'a>(board: &'a Value, title: &str) -> &'a Value {
    board["columns"]
        .as_array()
        .unwrap()
        .iter()
        .find(|column| column["title"] == title)
        .unwrap_or_else(|| panic!("No column titled {}", title))
}

/// ID of the column with the given title
pub fn column_id(board: &Value, title: &str) -> String {
    column(board, title)["id"].as_str().unwrap().to_string()
}

/// ID of the card with the given title, searching every column
pub fn card_id(board: &Value, title: &str) -> String {
    board["columns"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|column| column["cards"].as_array().unwrap().iter())
        .find(|card| card["title"] == title)
        .and_then(|card| card["id"].as_str())
        .unwrap_or_else(|| panic!("No card titled {}", title))
        .to_string()
}

/// Card titles of a column in the order returned
pub fn card_titles(board: &Value, column_title: &str) -> Vec<String> {
    column(board, column_title)["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["title"].as_str().unwrap().to_string())
        .collect()
}

/// Card positions of a column in the order returned
pub fn card_positions(board: &Value, column_title: &str) -> Vec<i64> {
    column(board, column_title)["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["position"].as_i64().unwrap())
        .collect()
}

/// Adds a card through the API, returning the board
pub async fn add_card(app: &Router, project: &str, column_id: &str, body: Value) -> Value {
    let uri = format!("/boards/{}/columns/{}/cards", project, column_id);
    let (status, board) = send(app, "POST", &uri, Some(body)).await;
    assert_eq!(status, StatusCode::OK, "add card failed: {}", board);
    board
}

/// Seeds "To do" = [A, B, C] and "Done" = [D] on the project's board
pub async fn seed_board(app: &Router, project: &str) -> Value {
    let board = get_board(app, project).await;
    let todo = column_id(&board, "To do");
    let done = column_id(&board, "Done");
    for title in ["A", "B", "C"] {
        add_card(app, project, &todo, serde_json::json!({ "title": title })).await;
    }
    add_card(app, project, &done, serde_json::json!({ "title": "D" })).await
}
