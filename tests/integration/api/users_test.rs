//! User profile API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::assertions::assert_error;
use crate::common::{register_named, TestApp};

#[tokio::test]
async fn test_get_me() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;

    let response = app
        .server
        .get("/api/users/me")
        .authorization_bearer(&ann.token)
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "id": ann.id, "email": "ann@example.com", "name": "Ann" }));
}

#[tokio::test]
async fn test_update_me() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;
    register_named(&app.server, "Bob").await;

    let renamed = app
        .server
        .put("/api/users/me")
        .authorization_bearer(&ann.token)
        .json(&json!({ "name": "Annie" }))
        .await;
    renamed.assert_status_ok();
    let body: Value = renamed.json();
    assert_eq!(body["name"], "Annie");
    assert_eq!(body["email"], "ann@example.com");

    let taken = app
        .server
        .put("/api/users/me")
        .authorization_bearer(&ann.token)
        .json(&json!({ "email": "BOB@example.com" }))
        .await;
    assert_error(&taken, StatusCode::CONFLICT, "Email already in use");
}

#[tokio::test]
async fn test_search_users() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;
    register_named(&app.server, "Annabel").await;
    register_named(&app.server, "Bob").await;

    let response = app
        .server
        .get("/api/users/search")
        .authorization_bearer(&ann.token)
        .add_query_param("query", "ANN")
        .await;
    response.assert_status_ok();

    let found: Vec<Value> = response.json();
    let names: Vec<&str> = found.iter().filter_map(|u| u["name"].as_str()).collect();
    assert_eq!(names, vec!["Annabel"]);

    let empty = app
        .server
        .get("/api/users/search")
        .authorization_bearer(&ann.token)
        .add_query_param("query", "  ")
        .await;
    assert_error(&empty, StatusCode::BAD_REQUEST, "Search query is required");
}

#[tokio::test]
async fn test_get_user_by_id() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;
    let bob = register_named(&app.server, "Bob").await;

    let response = app
        .server
        .get(&format!("/api/users/{}", bob.id))
        .authorization_bearer(&ann.token)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["email"], "bob@example.com");

    let missing = app
        .server
        .get(&format!("/api/users/{}", uuid::Uuid::new_v4()))
        .authorization_bearer(&ann.token)
        .await;
    assert_error(&missing, StatusCode::NOT_FOUND, "User not found");
}
