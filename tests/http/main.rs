//! HTTP transport tests.
//!
//! Starts the axum router on an ephemeral port and exercises it with reqwest.

#![cfg(feature = "http")]

use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use unperline::{handlers, service, HashMapRepository, Settings};

/// Bind to port 0 and return the base URL.
async fn start_server() -> String {
    let service = Arc::new(handlers::service(HashMapRepository::new(), Settings::default()));
    let app = service::router(service);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn register(client: &Client, base: &str, username: &str) -> u64 {
    let resp = client
        .post(format!("{base}/register"))
        .json(&json!({ "username": username, "email": format!("{username}@example.com") }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    body["id"].as_u64().unwrap()
}

#[tokio::test]
async fn health_lists_commands() {
    let base = start_server().await;
    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    let commands = body["commands"].as_array().unwrap();
    assert!(commands.iter().any(|c| c == "book.apply"));
    assert!(commands.iter().any(|c| c == "friends.books"));
}

#[tokio::test]
async fn apply_then_query_book() {
    let base = start_server().await;
    let client = Client::new();
    let ada = register(&client, &base, "ada").await;

    let resp = client
        .post(format!("{base}/books/vol-1"))
        .header("x-user-id", ada.to_string())
        .json(&json!({ "action": "rate", "rating": 7, "liked": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["readBooks"], json!(["vol-1"]));
    assert_eq!(body["bookRatings"]["vol-1"]["rating"], 7);

    let state: Value = client
        .get(format!("{base}/books/vol-1"))
        .header("x-user-id", ada.to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state["exists"], true);
    assert_eq!(state["isRead"], true);
    assert_eq!(state["liked"], true);
    assert_eq!(state["isInReadList"], false);
}

#[tokio::test]
async fn missing_identity_is_401() {
    let base = start_server().await;
    let resp = Client::new()
        .post(format!("{base}/books/vol-1"))
        .json(&json!({ "action": "read" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("unauthorized"));

    let resp = Client::new()
        .post(format!("{base}/books/vol-1"))
        .json(&json!({ "action": "burn" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unreadable_body_is_400_with_error_envelope() {
    let base = start_server().await;
    let client = Client::new();
    let ada = register(&client, &base, "ada").await;

    let malformed = client
        .post(format!("{base}/books/vol-1"))
        .header("x-user-id", ada.to_string())
        .header("content-type", "application/json")
        .body("{ \"action\": ");
    let untyped = client
        .put(format!("{base}/profile"))
        .header("x-user-id", ada.to_string())
        .body("{}");

    for request in [malformed, untyped] {
        let resp = request.send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().starts_with("decode failed"));
    }
}

#[tokio::test]
async fn client_errors_map_to_statuses() {
    let base = start_server().await;
    let client = Client::new();
    let ada = register(&client, &base, "ada").await;

    let send = |body: Value| {
        client
            .post(format!("{base}/books/vol-1"))
            .header("x-user-id", ada.to_string())
            .json(&body)
            .send()
    };

    let resp = send(json!({ "action": "burn" })).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(json!({ "action": "rate", "rating": 12 })).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = client
        .get(format!("{base}/books/vol-1"))
        .header("x-user-id", "404")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_registration_is_409() {
    let base = start_server().await;
    let client = Client::new();
    register(&client, &base, "ada").await;

    let resp = client
        .post(format!("{base}/register"))
        .json(&json!({ "username": "ada", "email": "new@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Username already exists");
}

#[tokio::test]
async fn profile_roundtrip_and_public_pages() {
    let base = start_server().await;
    let client = Client::new();
    let ada = register(&client, &base, "ada").await;

    let resp = client
        .put(format!("{base}/profile"))
        .header("x-user-id", ada.to_string())
        .json(&json!({ "bio": "reads at night" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    client
        .post(format!("{base}/books/vol-9"))
        .header("x-user-id", ada.to_string())
        .json(&json!({ "action": "readList" }))
        .send()
        .await
        .unwrap();

    let profile: Value = reqwest::get(format!("{base}/p/ada/profile"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile["bio"], "reads at night");
    assert_eq!(profile["stats"]["readList"], 1);

    let readlist: Value = reqwest::get(format!("{base}/p/ada/readlist"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(readlist["readList"], json!(["vol-9"]));

    let resp = reqwest::get(format!("{base}/p/ada/nonsense")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_profile_then_404() {
    let base = start_server().await;
    let client = Client::new();
    let ada = register(&client, &base, "ada").await;

    let resp = client
        .delete(format!("{base}/profile"))
        .header("x-user-id", ada.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base}/profile"))
        .header("x-user-id", ada.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn generic_command_route() {
    let base = start_server().await;
    let client = Client::new();
    register(&client, &base, "ada").await;

    let resp = client
        .post(format!("{base}/commands/public.profile"))
        .json(&json!({ "handle": "ada" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{base}/commands/nope"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
