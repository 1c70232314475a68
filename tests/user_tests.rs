mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

#[tokio::test]
async fn test_create_and_list_users() {
    let app = create_test_app();

    let (status, user) = send(&app, "POST", "/users", Some(json!({ "name": "Ann", "email": "ann@example.com" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["name"], "Ann");
    assert!(user["id"].is_string());
    assert!(user["createdAt"].is_string());

    let (status, users) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_user_by_id() {
    let app = create_test_app();
    let (_, created) = send(&app, "POST", "/users", Some(json!({ "name": "Ann", "email": "ann@example.com" }))).await;

    let uri = format!("/users/{}", created["id"].as_str().unwrap());
    let (status, user) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user, created);

    let (status, body) = send(&app, "GET", "/users/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn test_duplicate_email_is_400() {
    let app = create_test_app();
    let body = json!({ "name": "Ann", "email": "ann@example.com" });

    send(&app, "POST", "/users", Some(body.clone())).await;
    let (status, body) = send(&app, "POST", "/users", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("already registered"));
}

#[tokio::test]
async fn test_assignees_are_expanded_on_cards() {
    let app = create_test_app();
    let (_, user) = send(&app, "POST", "/users", Some(json!({
        "name": "Ann",
        "email": "ann@example.com",
        "avatar": "https://example.com/ann.png"
    })))
    .await;
    let board = get_board(&app, "p").await;
    let todo = column_id(&board, "To do");

    let board = add_card(&app, "p", &todo, json!({ "title": "A", "assignees": [user["id"]] })).await;

    let assignee = &column(&board, "To do")["cards"][0]["assignees"][0];
    assert_eq!(assignee["id"], user["id"]);
    assert_eq!(assignee["name"], "Ann");
    assert_eq!(assignee["email"], "ann@example.com");
    assert_eq!(assignee["avatar"], "https://example.com/ann.png");

    let uri = format!("/boards/p/columns/{}/cards", todo);
    let (status, _) = send(&app, "POST", &uri, Some(json!({ "title": "B", "assignees": ["ghost"] }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
