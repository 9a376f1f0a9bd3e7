//! Tests for the HTTP routes.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use tower::ServiceExt;

use scrabble_rules::WordList;
use scrabble_server::{AppState, GameRepository, GameService, PLAYER_HEADER, TracingNotifier, router};

/// Creates a migrated temporary database and the router over it.
fn setup_app() -> (NamedTempFile, axum::Router) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = GameRepository::new(db_path, 5000).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");

    let service = GameService::new(
        repo,
        Arc::new(WordList::from_words(["CHAT"])),
        Arc::new(TracingNotifier),
        Some(1),
    );
    (db_file, router(AppState::new(Arc::new(service))))
}

async fn send(app: &axum::Router, method: &str, uri: &str, player: Option<i64>, body: Value) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(id) = player {
        builder = builder.header(PLAYER_HEADER, id.to_string());
    }
    let request = builder
        .body(Body::from(body.to_string()))
        .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

async fn register(app: &axum::Router, name: &str) -> i64 {
    let (status, body) = send(app, "POST", "/players", None, json!({ "display_name": name })).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("player id")
}

async fn start_game(app: &axum::Router, creator: i64) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/games",
        Some(creator),
        json!({ "name": "Partie", "opponents": ["bob"] }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().expect("game id").to_string()
}

#[tokio::test]
async fn test_missing_caller_is_unauthorized() {
    let (_db, app) = setup_app();
    let (status, body) = send(&app, "GET", "/games", None, Value::Null).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "unauthenticated");
}

#[tokio::test]
async fn test_duplicate_player_conflicts() {
    let (_db, app) = setup_app();
    register(&app, "alice").await;
    let (status, body) = send(&app, "POST", "/players", None, json!({ "display_name": "alice" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "resource");
}

#[tokio::test]
async fn test_game_lifecycle_over_http() {
    let (_db, app) = setup_app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let game = start_game(&app, alice).await;

    let (status, list) = send(&app, "GET", "/games", Some(bob), Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    // Bob moving on Alice's turn is an authorization failure.
    let (status, body) = send(&app, "POST", &format!("/games/{game}/pass"), Some(bob), Value::Null).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "authorization");

    let (status, body) = send(&app, "POST", &format!("/games/{game}/pass"), Some(alice), Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["next_turn"], bob);
    assert_eq!(body["game_over"], false);

    let (status, body) = send(&app, "POST", &format!("/games/{game}/rack"), Some(bob), Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rack"].as_str().map(|r| r.chars().count()), Some(7));

    let (status, details) = send(&app, "GET", &format!("/games/{game}"), Some(alice), Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["status"], "ongoing");
    assert_eq!(details["moves"].as_array().map(Vec::len), Some(1));
    assert_eq!(details["board"].as_array().map(Vec::len), Some(15));
}

#[tokio::test]
async fn test_move_errors_map_to_statuses() {
    let (_db, app) = setup_app();
    let alice = register(&app, "alice").await;
    register(&app, "bob").await;
    let carol = register(&app, "carol").await;
    let game = start_game(&app, alice).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/games/{game}/moves"),
        Some(alice),
        json!({ "letters": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "validation");

    let (status, _) = send(
        &app,
        "POST",
        &format!("/games/{game}/moves"),
        Some(carol),
        json!({ "letters": [{ "x": 7, "y": 7, "char": "A" }] }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", "/games/unknown", Some(alice), Value::Null).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "resource");
}

#[tokio::test]
async fn test_simulate_over_http() {
    let (_db, app) = setup_app();
    let alice = register(&app, "alice").await;
    register(&app, "bob").await;
    let game = start_game(&app, alice).await;

    let letters = json!({ "letters": [
        { "x": 5, "y": 7, "char": "C" },
        { "x": 6, "y": 7, "char": "H" },
        { "x": 7, "y": 7, "char": "A" },
        { "x": 8, "y": 7, "char": "T", "blank": true }
    ] });
    let (status, body) = send(&app, "POST", &format!("/games/{game}/simulate"), Some(alice), letters).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "score": 16 }));
}

#[tokio::test]
async fn test_rename_and_delete_over_http() {
    let (_db, app) = setup_app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let game = start_game(&app, alice).await;

    let (status, _) = send(&app, "PATCH", &format!("/games/{game}"), Some(bob), json!({ "name": "x" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "PATCH", &format!("/games/{game}"), Some(alice), json!({ "name": "Soir" })).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &format!("/games/{game}"), Some(alice), Value::Null).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/games/{game}"), Some(alice), Value::Null).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
