//! Authentication API integration tests
//!
//! Tests for registration, login, password reset and the auth middleware.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::assertions::assert_error;
use crate::common::{register_named, register_user, TestApp, TEST_PASSWORD};

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({ "email": "Ann@Example.com", "password": "secret1", "name": " Ann " }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["email"], "ann@example.com");
    assert_eq!(body["user"]["name"], "Ann");
    assert!(body["user"].get("passwordHash").is_none());

    let welcome = app.mail.wait_for("ann@example.com", "Welcome").await;
    assert_eq!(welcome.subject, "Welcome to EditSync!");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new();
    register_user(&app.server, "Ann", "ann@example.com").await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({ "email": "ANN@example.com", "password": TEST_PASSWORD, "name": "Other" }))
        .await;

    assert_error(&response, StatusCode::CONFLICT, "Email already registered");
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new();

    let missing = app
        .server
        .post("/api/auth/register")
        .json(&json!({ "email": "ann@example.com" }))
        .await;
    assert_error(
        &missing,
        StatusCode::BAD_REQUEST,
        "All fields (email, password, name) are required",
    );

    let short = app
        .server
        .post("/api/auth/register")
        .json(&json!({ "email": "ann@example.com", "password": "12345", "name": "Ann" }))
        .await;
    assert_error(
        &short,
        StatusCode::BAD_REQUEST,
        "Password must be at least 6 characters long",
    );
}

#[tokio::test]
async fn test_register_still_succeeds_when_welcome_mail_fails() {
    let app = TestApp::new();
    app.mail.fail_deliveries();
    register_named(&app.server, "Ann").await;
}

#[tokio::test]
async fn test_register_does_not_wait_for_welcome_mail() {
    let app = TestApp::new();
    app.mail.stall_deliveries();

    let registered = tokio::time::timeout(
        std::time::Duration::from_secs(2),
        register_named(&app.server, "Ann"),
    )
    .await;
    assert!(registered.is_ok(), "registration blocked on the mail relay");
    assert!(app.mail.sent().await.is_empty());
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "ANN@example.com", "password": TEST_PASSWORD }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user"]["id"], ann.id);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = TestApp::new();
    register_named(&app.server, "Ann").await;

    let wrong_password = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "ann@example.com", "password": "wrongpassword" }))
        .await;
    assert_error(&wrong_password, StatusCode::UNAUTHORIZED, "Invalid email or password");

    let unknown = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": "wrongpassword" }))
        .await;
    assert_error(&unknown, StatusCode::UNAUTHORIZED, "Invalid email or password");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new();

    let response = app.server.get("/api/users/me").await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Please authenticate");

    let response = app
        .server
        .get("/api/documents")
        .authorization_bearer("not-a-token")
        .await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Please authenticate");
}

#[tokio::test]
async fn test_token_of_deleted_user_is_rejected() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;

    app.server
        .delete("/api/users/me")
        .authorization_bearer(&ann.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .get("/api/users/me")
        .authorization_bearer(&ann.token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let app = TestApp::new();
    register_named(&app.server, "Ann").await;

    app.server
        .post("/api/auth/request-reset")
        .json(&json!({ "email": "ann@example.com" }))
        .await
        .assert_status_ok();

    let mail = app.mail.wait_for("ann@example.com", "Password Reset").await;
    let link_start = mail.html.find("http://app.test/reset-password?token=").unwrap();
    let token: String = mail.html[link_start..]
        .trim_start_matches("http://app.test/reset-password?token=")
        .chars()
        .take_while(char::is_ascii_hexdigit)
        .collect();
    assert_eq!(token.len(), 64);

    app.server
        .post("/api/auth/reset-password")
        .json(&json!({ "token": token, "password": "brand-new" }))
        .await
        .assert_status_ok();

    // the token is single use
    let reused = app
        .server
        .post("/api/auth/reset-password")
        .json(&json!({ "token": token, "password": "another1" }))
        .await;
    assert_error(&reused, StatusCode::BAD_REQUEST, "Invalid or expired token");

    app.server
        .post("/api/auth/login")
        .json(&json!({ "email": "ann@example.com", "password": "brand-new" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_request_reset_errors() {
    let app = TestApp::new();
    register_named(&app.server, "Ann").await;

    let missing = app
        .server
        .post("/api/auth/request-reset")
        .json(&json!({}))
        .await;
    assert_error(&missing, StatusCode::BAD_REQUEST, "Email is required");

    let unknown = app
        .server
        .post("/api/auth/request-reset")
        .json(&json!({ "email": "nobody@example.com" }))
        .await;
    assert_error(&unknown, StatusCode::NOT_FOUND, "No user found with that email");

    app.mail.fail_deliveries();
    let undeliverable = app
        .server
        .post("/api/auth/request-reset")
        .json(&json!({ "email": "ann@example.com" }))
        .await;
    assert_error(
        &undeliverable,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to send password reset email",
    );
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.server.get("/api/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}
