//! End-to-end collaboration scenario
//!
//! One owner, one invitee: access follows the collaborator set through
//! sharing, editing, live updates and removal.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{create_document, id_of, register_named, TestApp};

#[tokio::test]
async fn test_collaborator_lifecycle() {
    let app = TestApp::new();
    let u1 = register_named(&app.server, "Ann").await;
    let u2 = register_named(&app.server, "Bob").await;

    let doc = create_document(&app.server, &u1, "Notes").await;
    let path = format!("/api/documents/{}", id_of(&doc));

    // not shared yet
    app.server
        .get(&path)
        .authorization_bearer(&u2.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.server
        .post(&format!("{}/share", path))
        .authorization_bearer(&u1.token)
        .json(&json!({ "collaboratorIds": [u2.id] }))
        .await
        .assert_status_ok();

    app.server
        .get(&path)
        .authorization_bearer(&u2.token)
        .await
        .assert_status_ok();

    let edited = app
        .server
        .put(&path)
        .authorization_bearer(&u2.token)
        .json(&json!({ "content": "edited by bob" }))
        .await;
    edited.assert_status_ok();
    assert_eq!(edited.json::<Value>()["content"], "edited by bob");

    app.server
        .delete(&path)
        .authorization_bearer(&u2.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // live edits while shared
    let mut owner_ws = app
        .server
        .get_websocket("/ws")
        .add_query_param("token", &u1.token)
        .await
        .into_websocket()
        .await;
    let mut bob_ws = app
        .server
        .get_websocket("/ws")
        .add_query_param("token", &u2.token)
        .await
        .into_websocket()
        .await;
    for ws in [&mut owner_ws, &mut bob_ws] {
        ws.send_json(&json!({ "event": "join-document", "data": id_of(&doc) })).await;
        ws.send_text("sync").await;
        let _: Value = ws.receive_json().await;
    }
    bob_ws
        .send_json(&json!({
            "event": "document-change",
            "data": { "documentId": id_of(&doc), "changes": { "cursor": 4 } }
        }))
        .await;
    assert_eq!(
        owner_ws.receive_json::<Value>().await,
        json!({ "event": "document-update", "data": { "cursor": 4 } })
    );

    app.server
        .delete(&format!("{}/users/{}", path, u2.id))
        .authorization_bearer(&u1.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .get(&path)
        .authorization_bearer(&u2.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // the open socket loses its access along with the HTTP surface
    bob_ws
        .send_json(&json!({
            "event": "document-change",
            "data": { "documentId": id_of(&doc), "changes": { "cursor": 9 } }
        }))
        .await;
    assert_eq!(
        bob_ws.receive_json::<Value>().await,
        json!({ "event": "error", "data": { "message": "Document not found" } })
    );

    let listed: Vec<Value> = app
        .server
        .get("/api/documents")
        .authorization_bearer(&u2.token)
        .await
        .json();
    assert!(listed.is_empty());
}
