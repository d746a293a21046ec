//! End-to-end tests of the REST API over a temporary database.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use compute_server::api::{AppState, ErrorBody, router};
use compute_server::{GameRepository, GameService, Leaderboard, seed_samples};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use tower::ServiceExt;

fn setup_app(seed: bool) -> (NamedTempFile, Router) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    if seed {
        seed_samples(&repo).expect("Seed failed");
    }
    let app = router(AppState::new(GameService::new(repo)));
    (db_file, app)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Body was not JSON")
    };
    (status, value)
}

fn error_message(body: Value) -> String {
    serde_json::from_value::<ErrorBody>(body)
        .expect("Not an error body")
        .error
}

#[tokio::test]
async fn test_health() {
    let (_db, app) = setup_app(false);
    let (status, body) = send(&app, Method::GET, "/api", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
}

#[tokio::test]
async fn test_sign_up_then_duplicate() {
    let (_db, app) = setup_app(false);
    let creds = json!({"username": "alice", "password": "hunter2"});

    let (status, body) = send(&app, Method::POST, "/api/players", Some(creds.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["points"], 500);
    assert_eq!(body["numPlayed"], 0);
    assert!(body.get("salt").is_none());
    assert!(body.get("hashedPassword").is_none());

    let (status, body) = send(&app, Method::POST, "/api/players", Some(creds)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(body), "Username already taken.");

    let (status, body) = send(&app, Method::GET, "/api/players", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"players": ["alice"]}));
}

#[tokio::test]
async fn test_sign_up_rejects_empty_username() {
    let (_db, app) = setup_app(false);
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/players",
        Some(json!({"username": " ", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_log_in_against_seeded_account() {
    let (_db, app) = setup_app(true);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/players/sample1",
        Some(json!({"password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(body), "Incorrect password.");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/players/nobody",
        Some(json!({"password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(body), "A player with this username does not exist.");
}

#[tokio::test]
async fn test_log_in_after_sign_up() {
    let (_db, app) = setup_app(false);
    send(
        &app,
        Method::POST,
        "/api/players",
        Some(json!({"username": "bob", "password": "pw"})),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/players/bob",
        Some(json!({"password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "bob");
}

#[tokio::test]
async fn test_patch_then_get_stats() {
    let (_db, app) = setup_app(false);
    send(
        &app,
        Method::POST,
        "/api/players",
        Some(json!({"username": "cat", "password": "pw"})),
    )
    .await;

    let stats = json!({"points": 530, "numWins": 1, "numPlayed": 2, "winRatio": 0.5});
    let (status, body) = send(&app, Method::PATCH, "/api/players/cat", Some(stats.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, body) = send(&app, Method::GET, "/api/players/cat", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, stats);
}

#[tokio::test]
async fn test_patch_unknown_player_is_not_found() {
    let (_db, app) = setup_app(false);
    let stats = json!({"points": 530, "numWins": 1, "numPlayed": 2, "winRatio": 0.5});
    let (status, _) = send(&app, Method::PATCH, "/api/players/ghost", Some(stats)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/api/players/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_rejects_more_wins_than_games() {
    let (_db, app) = setup_app(true);
    let stats = json!({"points": 530, "numWins": 3, "numPlayed": 2, "winRatio": 1.5});
    let (status, _) = send(&app, Method::PATCH, "/api/players/sample2", Some(stats)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_prompts_lifecycle() {
    let (_db, app) = setup_app(false);

    let (status, _) = send(&app, Method::GET, "/api/prompts", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/prompts",
        Some(json!({"contributor": "amy", "question": "Keys on a piano?", "answer": 88})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 0);

    let (status, body) = send(&app, Method::GET, "/api/prompts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": 0, "contributor": "amy", "question": "Keys on a piano?", "answer": 88.0})
    );
}

#[tokio::test]
async fn test_add_prompt_rejects_non_positive_answer() {
    let (_db, app) = setup_app(false);
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/prompts",
        Some(json!({"contributor": "amy", "question": "Q?", "answer": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_leaderboard_requires_positive_num() {
    let (_db, app) = setup_app(true);
    for uri in ["/api/leaderboard", "/api/leaderboard?num=abc", "/api/leaderboard?num=0"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body.get("error").is_some());
    }
}

#[tokio::test]
async fn test_leaderboard_shape() {
    let (_db, app) = setup_app(true);
    let stats = json!({"points": 900, "numWins": 2, "numPlayed": 3, "winRatio": 0.67});
    send(&app, Method::PATCH, "/api/players/sample3", Some(stats)).await;

    let (status, body) = send(&app, Method::GET, "/api/leaderboard?num=2", None).await;
    assert_eq!(status, StatusCode::OK);

    let board: Leaderboard = serde_json::from_value(body).expect("Bad leaderboard");
    assert_eq!(
        board.by_points(),
        &[("sample3".to_string(), 900), ("sample1".to_string(), 500)]
    );
    assert_eq!(board.by_win_ratio().len(), 2);
    assert_eq!(board.by_win_ratio()[0], ("sample3".to_string(), 0.67));
}

#[tokio::test]
async fn test_missing_field_is_json_bad_request() {
    let (_db, app) = setup_app(false);
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/players",
        Some(json!({"username": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(body).contains("password"));
}

#[tokio::test]
async fn test_mistyped_answer_is_json_bad_request() {
    let (_db, app) = setup_app(false);
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/prompts",
        Some(json!({"contributor": "amy", "question": "Q?", "answer": "lots"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_missing_content_type_is_json_bad_request() {
    let (_db, app) = setup_app(true);
    let request = Request::builder()
        .method(Method::PATCH)
        .uri("/api/players/sample1")
        .body(Body::from(r#"{"points":1,"numWins":0,"numPlayed":0,"winRatio":0}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: ErrorBody = serde_json::from_slice(&bytes).expect("Not an error body");
    assert!(!body.error.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_all_succeed() {
    let (_db, app) = setup_app(false);

    let mut tasks = Vec::new();
    for i in 0..32 {
        let app1 = app.clone();
        tasks.push(tokio::spawn(async move {
            send(
                &app1,
                Method::POST,
                "/api/players",
                Some(json!({"username": format!("player{i}"), "password": "pw"})),
            )
            .await
        }));
        let app2 = app.clone();
        tasks.push(tokio::spawn(async move {
            send(
                &app2,
                Method::POST,
                "/api/prompts",
                Some(json!({"contributor": "amy", "question": format!("Q{i}?"), "answer": i + 1})),
            )
            .await
        }));
    }
    for task in tasks {
        let (status, body) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let (_, body) = send(&app, Method::GET, "/api/players", None).await;
    assert_eq!(body["players"].as_array().unwrap().len(), 32);
}
