//! Collaborator and sharing API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::assertions::assert_error;
use crate::common::{create_document, id_of, register_named, register_user, TestApp, TEST_PASSWORD};
use crate::assert_contains;

#[tokio::test]
async fn test_set_collaborators_replaces_the_set() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;
    let bob = register_named(&app.server, "Bob").await;
    let carol = register_named(&app.server, "Carol").await;
    let doc = create_document(&app.server, &ann, "Plan").await;
    let id = id_of(&doc);

    app.server
        .post(&format!("/api/documents/{}/share", id))
        .authorization_bearer(&ann.token)
        .json(&json!({ "collaboratorIds": [bob.id, bob.id] }))
        .await
        .assert_status_ok();
    let replaced = app
        .server
        .post(&format!("/api/documents/{}/share", id))
        .authorization_bearer(&ann.token)
        .json(&json!({ "collaboratorIds": [carol.id] }))
        .await;
    replaced.assert_status_ok();
    assert_eq!(replaced.json::<Value>()["collaborators"], json!([carol.id]));

    let users: Vec<Value> = app
        .server
        .get(&format!("/api/documents/{}/users", id))
        .authorization_bearer(&ann.token)
        .await
        .json();
    assert_eq!(
        users,
        vec![
            json!({ "id": ann.id, "email": "ann@example.com", "permission": "owner", "avatar": "A" }),
            json!({ "id": carol.id, "email": "carol@example.com", "permission": "collaborator", "avatar": "C" }),
        ]
    );
}

#[tokio::test]
async fn test_set_collaborators_rejects_owner_and_unknown_ids() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;
    let doc = create_document(&app.server, &ann, "Plan").await;
    let path = format!("/api/documents/{}/share", id_of(&doc));

    app.server
        .post(&path)
        .authorization_bearer(&ann.token)
        .json(&json!({ "collaboratorIds": [ann.id] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .post(&path)
        .authorization_bearer(&ann.token)
        .json(&json!({ "collaboratorIds": [uuid::Uuid::new_v4()] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invite_is_idempotent_and_creates_placeholder() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;
    let doc = create_document(&app.server, &ann, "Plan").await;
    let path = format!("/api/documents/{}/invite", id_of(&doc));

    let first = app
        .server
        .post(&path)
        .authorization_bearer(&ann.token)
        .json(&json!({ "email": "New.Person@Example.com", "permission": "edit" }))
        .await;
    first.assert_status_ok();
    let invited: Value = first.json();
    assert_eq!(invited["email"], "new.person@example.com");
    assert_eq!(invited["permission"], "edit");
    assert_eq!(invited["avatar"], "N");

    let second: Value = app
        .server
        .post(&path)
        .authorization_bearer(&ann.token)
        .json(&json!({ "email": "new.person@example.com" }))
        .await
        .json();
    assert_eq!(second["id"], invited["id"]);

    let doc: Value = app
        .server
        .get(&format!("/api/documents/{}", id_of(&doc)))
        .authorization_bearer(&ann.token)
        .await
        .json();
    assert_eq!(doc["collaborators"], json!([invited["id"]]));

    // a placeholder cannot log in
    app.server
        .post("/api/auth/login")
        .json(&json!({ "email": "new.person@example.com", "password": "" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.server
        .post("/api/auth/login")
        .json(&json!({ "email": "new.person@example.com", "password": "anything" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    // registering claims the placeholder and its access
    let claimed = register_user(&app.server, "New Person", "new.person@example.com").await;
    assert_eq!(json!(claimed.id), invited["id"]);
    app.server
        .get(&format!("/api/documents/{}", id_of(&doc)))
        .authorization_bearer(&claimed.token)
        .await
        .assert_status_ok();
    app.server
        .post("/api/auth/login")
        .json(&json!({ "email": "new.person@example.com", "password": TEST_PASSWORD }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_invite_errors() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;
    let eve = register_named(&app.server, "Eve").await;
    let doc = create_document(&app.server, &ann, "Plan").await;
    let path = format!("/api/documents/{}/invite", id_of(&doc));

    app.server
        .post(&path)
        .authorization_bearer(&ann.token)
        .json(&json!({ "email": "ann@example.com" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .post(&path)
        .authorization_bearer(&ann.token)
        .json(&json!({ "email": "not-an-email" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // a stranger cannot even learn the document exists
    let stranger = app
        .server
        .post(&path)
        .authorization_bearer(&eve.token)
        .json(&json!({ "email": "x@example.com" }))
        .await;
    assert_error(&stranger, StatusCode::NOT_FOUND, "Document not found");
}

#[tokio::test]
async fn test_remove_collaborator() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;
    let bob = register_named(&app.server, "Bob").await;
    let doc = create_document(&app.server, &ann, "Plan").await;
    let id = id_of(&doc);

    app.server
        .post(&format!("/api/documents/{}/share", id))
        .authorization_bearer(&ann.token)
        .json(&json!({ "collaboratorIds": [bob.id] }))
        .await
        .assert_status_ok();

    let owner = app
        .server
        .delete(&format!("/api/documents/{}/users/{}", id, ann.id))
        .authorization_bearer(&ann.token)
        .await;
    assert_error(&owner, StatusCode::FORBIDDEN, "Cannot remove the document owner");

    // a collaborator cannot remove others, not even the owner
    app.server
        .delete(&format!("/api/documents/{}/users/{}", id, ann.id))
        .authorization_bearer(&bob.token)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .delete(&format!("/api/documents/{}/users/{}", id, bob.id))
        .authorization_bearer(&ann.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let again = app
        .server
        .delete(&format!("/api/documents/{}/users/{}", id, bob.id))
        .authorization_bearer(&ann.token)
        .await;
    assert_error(&again, StatusCode::NOT_FOUND, "User is not a collaborator");
}

#[tokio::test]
async fn test_share_by_email() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;
    let doc = create_document(&app.server, &ann, "Roadmap <2025>").await;
    let path = format!("/api/documents/{}/share-email", id_of(&doc));

    let response = app
        .server
        .post(&path)
        .authorization_bearer(&ann.token)
        .json(&json!({ "email": "friend@example.com", "message": "Take a look" }))
        .await;
    response.assert_status_ok();
    response.assert_json(&json!({ "success": true, "message": "Share email sent successfully" }));

    let mail = app.mail.wait_for("friend@example.com", "shared a document").await;
    assert_eq!(mail.subject, "Ann shared a document with you");
    assert_contains!(mail.html, "Roadmap &lt;2025&gt;");
    assert_contains!(mail.html, "Take a look");
    assert_contains!(mail.html, "view permissions");

    let missing = app
        .server
        .post(&path)
        .authorization_bearer(&ann.token)
        .json(&json!({}))
        .await;
    assert_error(&missing, StatusCode::BAD_REQUEST, "Email is required");

    app.mail.fail_deliveries();
    let failed = app
        .server
        .post(&path)
        .authorization_bearer(&ann.token)
        .json(&json!({ "email": "friend@example.com" }))
        .await;
    assert_error(
        &failed,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to send email. Please check your email configuration.",
    );
}

#[tokio::test]
async fn test_share_grant_lifecycle() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;
    let bob = register_named(&app.server, "Bob").await;
    let doc = create_document(&app.server, &ann, "Plan").await;
    let path = format!("/api/documents/{}/grant", id_of(&doc));

    let absent = app.server.get(&path).authorization_bearer(&ann.token).await;
    assert_error(&absent, StatusCode::NOT_FOUND, "Share grant not found");

    let saved = app
        .server
        .put(&path)
        .authorization_bearer(&ann.token)
        .json(&json!({
            "isPublic": true,
            "permission": "comment",
            "sharedUsers": [
                { "email": "BOB@example.com", "permission": "edit" },
                { "email": "outsider@example.com" },
                { "email": "bob@example.com", "permission": "view" }
            ]
        }))
        .await;
    saved.assert_status_ok();
    let grant: Value = saved.json();
    assert_eq!(grant["ownerId"], ann.id);
    assert_eq!(grant["permission"], "comment");
    assert_eq!(
        grant["sharedUsers"],
        json!([
            { "userId": bob.id, "email": "bob@example.com", "permission": "edit" },
            { "userId": null, "email": "outsider@example.com", "permission": "view" }
        ])
    );

    // informational only: bob gains no access
    app.server
        .get(&format!("/api/documents/{}", id_of(&doc)))
        .authorization_bearer(&bob.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let expired = app
        .server
        .put(&path)
        .authorization_bearer(&ann.token)
        .json(&json!({ "isPublic": false, "expiresAt": "2001-01-01T00:00:00Z" }))
        .await;
    expired.assert_status_ok();
    app.server
        .get(&path)
        .authorization_bearer(&ann.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
