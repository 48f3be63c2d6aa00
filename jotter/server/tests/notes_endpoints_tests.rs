use axum::Router;
use axum::http::{Method, StatusCode};
use jotter_server::note::{NoteStore, create_notes_router};
use tower::ServiceExt;

mod common;

use common::{json_request, read_json};

/// Setup function for endpoint tests using an in-memory SQLite database.
async fn setup() -> Router {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let db = common::setup_db()
        .await
        .expect("Failed to setup test database");
    create_notes_router(NoteStore::new(db))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(json_request(method, uri, body))
        .await
        .unwrap();
    read_json(response).await
}

#[tokio::test]
async fn can_create_note_and_return_it() {
    let app = setup().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/notes",
        Some(r##"{"title":"Meeting notes","content":"# Heading"}"##),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["title"], "Meeting notes");
    assert_eq!(body["content"], "# Heading");
    assert_eq!(body["created_at"], body["updated_at"]);
}

#[tokio::test]
async fn can_reject_create_with_existing_id() {
    let app = setup().await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/notes",
        Some(r#"{"id":5,"title":"First draft"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/notes",
        Some(r#"{"id":5,"title":"Impostor","content":"overwrite?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ALREADY_EXISTS");
    assert_eq!(body["message"], "note with ID 5 already exists");

    let (status, stored) = send(&app, Method::GET, "/notes/5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["title"], "First draft");
    assert!(stored.get("content").is_none());
}

#[tokio::test]
async fn can_list_notes() {
    let app = setup().await;
    send(&app, Method::POST, "/notes", Some(r#"{"title":"First"}"#)).await;
    send(&app, Method::POST, "/notes", Some(r#"{"title":"Second"}"#)).await;

    let (status, body) = send(&app, Method::GET, "/notes", None).await;

    assert_eq!(status, StatusCode::OK);
    let mut titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|note| note["title"].as_str().unwrap())
        .collect();
    titles.sort();
    assert_eq!(titles, vec!["First", "Second"]);
}

#[tokio::test]
async fn can_return_empty_array_when_no_notes_exist() {
    let app = setup().await;

    let (status, body) = send(&app, Method::GET, "/notes", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn can_replace_note_content_on_update() {
    let app = setup().await;
    send(
        &app,
        Method::POST,
        "/notes",
        Some(r#"{"title":"Draft","content":"old text"}"#),
    )
    .await;

    let (status, _) = send(&app, Method::PUT, "/notes/1", Some(r#"{"title":"Draft v2"}"#)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, "/notes/1", None).await;
    assert_eq!(body["title"], "Draft v2");
    assert!(body.get("content").is_none());
}

#[tokio::test]
async fn can_delete_note() {
    let app = setup().await;
    send(&app, Method::POST, "/notes", Some(r#"{"title":"Temporary"}"#)).await;

    let (status, _) = send(&app, Method::DELETE, "/notes/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::DELETE, "/notes/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "note with ID 1 not found");
}

#[tokio::test]
async fn can_reject_body_without_json_content_type() {
    let app = setup().await;
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/notes")
        .body(axum::body::Body::from(r#"{"title":"No header"}"#))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    let (_, list) = send(&app, Method::GET, "/notes", None).await;
    assert_eq!(list, serde_json::json!([]));
}

#[tokio::test]
async fn can_reject_note_with_blank_title() {
    let app = setup().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/notes",
        Some(r##"{"title":" ","content":"# Heading"}"##),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid note: title must not be blank");
    let (_, list) = send(&app, Method::GET, "/notes", None).await;
    assert_eq!(list, serde_json::json!([]));
}
