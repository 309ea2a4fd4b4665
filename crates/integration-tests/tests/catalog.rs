//! Public catalog, health checks and static files.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::StatusCode;
use serde_json::{Value, json};

use watchshop_integration_tests::{TestApp, json_body};

#[tokio::test]
async fn test_welcome_text() {
    let app = TestApp::spawn().await;

    let resp = app.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "Welcome to the server!");
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::spawn().await;

    let resp = app.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    assert_eq!(app.get("/health/ready").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_empty_catalog_is_empty_list() {
    let app = TestApp::spawn().await;

    let resp = app.get("/watches").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!([]));
}

#[tokio::test]
async fn test_list_and_show_watches() {
    let app = TestApp::spawn().await;
    let first = app.seed_watch("Explorer", 1299.0).await;
    let second = app.seed_watch("Diver", 849.5).await;
    assert_eq!((first, second), (1, 2));

    let body = json_body(app.get("/watches").await).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Explorer", "Diver"]);

    let resp = app.get("/watches/2").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let watch = json_body(resp).await;
    assert_eq!(watch["id"], 2);
    assert_eq!(watch["price"], json!(849.5));
}

#[tokio::test]
async fn test_unknown_watch_is_404() {
    let app = TestApp::spawn().await;

    let resp = app.get("/watches/99").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await, json!({ "error": "Watch not found" }));
}

#[tokio::test]
async fn test_non_numeric_watch_id_is_400() {
    let app = TestApp::spawn().await;

    let resp = app.get("/watches/abc").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(resp).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_corrupt_catalog_is_500_without_details() {
    let app = TestApp::spawn().await;
    std::fs::write(app.data_dir().join("watches.json"), "[{\"id\": 1,").unwrap();

    let resp = app.get("/watches").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(resp).await,
        json!({ "error": "Internal server error" })
    );
}

#[tokio::test]
async fn test_public_files_are_served() {
    let app = TestApp::spawn().await;
    std::fs::write(app.public_dir().join("logo.txt"), "watchshop").unwrap();

    let resp = app.get("/logo.txt").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "watchshop");

    assert_eq!(app.get("/missing.png").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/"))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "abc-123");

    let resp = app.get("/").await;
    assert!(resp.headers().contains_key("x-request-id"));
}
