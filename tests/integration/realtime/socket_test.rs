//! WebSocket room integration tests
//!
//! Sessions are driven over a real socket. A session processes its frames
//! in order, so a malformed frame sent after a join and answered with an
//! error proves the join has been applied.

use axum::http::StatusCode;
use axum_test::{TestServer, TestWebSocket};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;

use crate::common::{create_document, id_of, register_named, TestApp, TestUser};

async fn connect(server: &TestServer, user: &TestUser) -> TestWebSocket {
    server
        .get_websocket("/ws")
        .add_query_param("token", &user.token)
        .await
        .into_websocket()
        .await
}

/// Send `frame`, then wait until the session has processed it
async fn send_and_settle(ws: &mut TestWebSocket, frame: Value) {
    ws.send_json(&frame).await;
    ws.send_text("sync").await;
    let reply: Value = ws.receive_json().await;
    assert_eq!(reply, json!({ "event": "error", "data": { "message": "Malformed event" } }));
}

async fn join(ws: &mut TestWebSocket, doc_id: &str) {
    send_and_settle(ws, json!({ "event": "join-document", "data": doc_id })).await;
}

fn change(doc_id: &str, changes: Value) -> Value {
    json!({ "event": "document-change", "data": { "documentId": doc_id, "changes": changes } })
}

async fn assert_silent(ws: &mut TestWebSocket) {
    let next = tokio::time::timeout(Duration::from_millis(200), ws.receive_text()).await;
    assert!(next.is_err(), "unexpected frame {:?}", next);
}

#[tokio::test]
async fn test_upgrade_requires_credential() {
    let app = TestApp::new();

    app.server
        .get_websocket("/ws")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    app.server
        .get_websocket("/ws")
        .add_query_param("token", "forged")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_fans_out_to_other_members() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;
    let bob = register_named(&app.server, "Bob").await;
    let carol = register_named(&app.server, "Carol").await;
    let doc = create_document(&app.server, &ann, "Live").await;
    let id = id_of(&doc);
    app.server
        .post(&format!("/api/documents/{}/share", id))
        .authorization_bearer(&ann.token)
        .json(&json!({ "collaboratorIds": [bob.id, carol.id] }))
        .await
        .assert_status_ok();

    let mut a = connect(&app.server, &ann).await;
    let mut b = connect(&app.server, &bob).await;
    let mut c = connect(&app.server, &carol).await;
    join(&mut a, &id).await;
    join(&mut b, &id).await;
    join(&mut c, &id).await;

    let payload = json!({ "ops": [{ "insert": "hi", "at": 0 }] });
    a.send_json(&change(&id, payload.clone())).await;

    let expected = json!({ "event": "document-update", "data": payload });
    assert_eq!(b.receive_json::<Value>().await, expected);
    assert_eq!(c.receive_json::<Value>().await, expected);
    assert_silent(&mut a).await;
}

#[tokio::test]
async fn test_join_without_view_access_is_refused() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;
    let eve = register_named(&app.server, "Eve").await;
    let doc = create_document(&app.server, &ann, "Secret").await;
    let id = id_of(&doc);

    let mut a = connect(&app.server, &ann).await;
    let mut e = connect(&app.server, &eve).await;
    join(&mut a, &id).await;

    e.send_json(&json!({ "event": "join-document", "data": id })).await;
    let refused: Value = e.receive_json().await;
    assert_eq!(
        refused,
        json!({ "event": "error", "data": { "message": "Document not found" } })
    );

    a.send_json(&change(&id, json!("secret edit"))).await;
    assert_silent(&mut e).await;
}

#[tokio::test]
async fn test_read_only_member_cannot_broadcast() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;
    let carol = register_named(&app.server, "Carol").await;
    let doc = create_document(&app.server, &ann, "Public").await;
    let id = id_of(&doc);
    app.server
        .patch(&format!("/api/documents/{}/public", id))
        .authorization_bearer(&ann.token)
        .await
        .assert_status_ok();

    let mut a = connect(&app.server, &ann).await;
    let mut c = connect(&app.server, &carol).await;
    join(&mut a, &id).await;
    join(&mut c, &id).await;

    c.send_json(&change(&id, json!("nope"))).await;
    let refused: Value = c.receive_json().await;
    assert_eq!(
        refused,
        json!({ "event": "error", "data": { "message": "You do not have edit access to this document" } })
    );
    assert_silent(&mut a).await;

    // viewers still receive the owner's changes
    a.send_json(&change(&id, json!("yes"))).await;
    assert_eq!(
        c.receive_json::<Value>().await,
        json!({ "event": "document-update", "data": "yes" })
    );
}

#[tokio::test]
async fn test_left_and_disconnected_sessions_receive_nothing() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;
    let doc = create_document(&app.server, &ann, "Live").await;
    let id = id_of(&doc);

    let mut first = connect(&app.server, &ann).await;
    let mut second = connect(&app.server, &ann).await;
    let third = connect(&app.server, &ann).await;
    join(&mut first, &id).await;
    join(&mut second, &id).await;
    assert_eq!(app.state.registry.session_count().await, 3);

    send_and_settle(&mut second, json!({ "event": "leave-document", "data": id })).await;
    third.close().await;

    first.send_json(&change(&id, json!(1))).await;
    assert_silent(&mut second).await;

    let doc_id = id.parse().unwrap();
    let members = app.state.registry.members_of(doc_id).await;
    assert_eq!(members.len(), 1);
}

async fn share_with(app: &TestApp, owner: &TestUser, doc_id: &str, collaborator: &TestUser) {
    app.server
        .post(&format!("/api/documents/{}/share", doc_id))
        .authorization_bearer(&owner.token)
        .json(&json!({ "collaboratorIds": [collaborator.id] }))
        .await
        .assert_status_ok();
}

async fn remove_from(app: &TestApp, owner: &TestUser, doc_id: &str, collaborator: &TestUser) {
    app.server
        .delete(&format!("/api/documents/{}/users/{}", doc_id, collaborator.id))
        .authorization_bearer(&owner.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_removed_collaborator_stops_receiving_changes() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;
    let bob = register_named(&app.server, "Bob").await;
    let doc = create_document(&app.server, &ann, "Plans").await;
    let id = id_of(&doc);
    share_with(&app, &ann, &id, &bob).await;

    let mut a = connect(&app.server, &ann).await;
    let mut b = connect(&app.server, &bob).await;
    join(&mut a, &id).await;
    join(&mut b, &id).await;

    remove_from(&app, &ann, &id, &bob).await;

    a.send_json(&change(&id, json!("secret"))).await;
    assert_eq!(
        b.receive_json::<Value>().await,
        json!({ "event": "error", "data": { "message": "You no longer have access to this document" } })
    );
    assert_silent(&mut b).await;

    b.send_json(&change(&id, json!("still here"))).await;
    assert_eq!(
        b.receive_json::<Value>().await,
        json!({ "event": "error", "data": { "message": "Join the document before sending changes" } })
    );
    assert_silent(&mut a).await;
}

#[tokio::test]
async fn test_removed_collaborator_cannot_broadcast() {
    let app = TestApp::new();
    let ann = register_named(&app.server, "Ann").await;
    let bob = register_named(&app.server, "Bob").await;
    let doc = create_document(&app.server, &ann, "Plans").await;
    let id = id_of(&doc);
    share_with(&app, &ann, &id, &bob).await;

    let mut a = connect(&app.server, &ann).await;
    let mut b = connect(&app.server, &bob).await;
    join(&mut a, &id).await;
    join(&mut b, &id).await;

    remove_from(&app, &ann, &id, &bob).await;

    b.send_json(&change(&id, json!("after-revoke"))).await;
    assert_eq!(
        b.receive_json::<Value>().await,
        json!({ "event": "error", "data": { "message": "Document not found" } })
    );
    assert_silent(&mut a).await;

    // rejoining is refused too
    b.send_json(&json!({ "event": "join-document", "data": id })).await;
    assert_eq!(
        b.receive_json::<Value>().await,
        json!({ "event": "error", "data": { "message": "Document not found" } })
    );
}
