//! Admin login, catalog management and image upload.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::json;

use watchshop_integration_tests::{TestApp, json_body};

#[tokio::test]
async fn test_admin_routes_require_login() {
    let app = TestApp::spawn().await;

    assert_eq!(app.get("/admin").await.status(), StatusCode::UNAUTHORIZED);
    let resp = app
        .post("/admin/watches", &json!({ "name": "X", "price": 1 }))
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(json_body(resp).await["error"].is_string());
}

#[tokio::test]
async fn test_admin_login_and_logout() {
    let app = TestApp::spawn().await;
    app.create_admin("root", "correct horse").await;

    let resp = app
        .post(
            "/admin/login",
            &json!({ "username": "root", "password": "wrong" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    app.login_admin("ROOT", "correct horse").await;
    let resp = app.get("/admin").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "Welcome to the admin section.");

    let resp = app.post("/admin/logout", &json!({})).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(app.get("/admin").await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_legacy_plaintext_admin_can_log_in() {
    let app = TestApp::spawn().await;
    std::fs::write(
        app.data_dir().join("admins.json"),
        r#"[{"username": "root", "password": "letmein"}]"#,
    )
    .unwrap();

    app.login_admin("root", "letmein").await;
    assert_eq!(app.get("/admin").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_user_with_admin_flag_passes_gate() {
    let app = TestApp::spawn().await;
    app.create_admin_user("boss@example.com", "pw").await;

    let resp = app
        .post(
            "/login",
            &json!({ "username": "boss@example.com", "password": "pw" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(app.get("/admin").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_plain_user_is_rejected() {
    let app = TestApp::spawn().await;
    app.login_new_user("alice@example.com", "pw").await;

    assert_eq!(app.get("/admin").await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_watch_crud() {
    let app = TestApp::spawn().await;
    app.create_admin("root", "pw").await;
    app.login_admin("root", "pw").await;

    let watch = app.create_watch("Explorer", 1299.0).await;
    assert_eq!(watch["id"], 1);
    assert_eq!(watch["name"], "Explorer");
    assert_eq!(watch["price"], 1299);

    let resp = app.get("/admin/watches/1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, watch);

    let resp = app
        .put(
            "/admin/watches/1",
            &json!({
                "name": "Explorer II",
                "collection": "Field",
                "price": 1499.99,
                "img": "explorer2.png",
                "description": "42mm",
            }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        json_body(resp).await,
        json!({ "message": "Watch updated successfully" })
    );

    let public = json_body(app.get("/watches/1").await).await;
    assert_eq!(public["id"], 1);
    assert_eq!(public["name"], "Explorer II");
    assert_eq!(public["price"], json!(1499.99));

    let resp = app.delete("/admin/watches/1", &json!({})).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(app.get("/watches/1").await.status(), StatusCode::NOT_FOUND);

    let resp = app.delete("/admin/watches/1", &json!({})).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = app
        .put("/admin/watches/1", &json!({ "name": "Ghost", "price": 1 }))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_watch_ids_are_not_reused() {
    let app = TestApp::spawn().await;
    app.create_admin("root", "pw").await;
    app.login_admin("root", "pw").await;

    app.create_watch("One", 1.0).await;
    app.create_watch("Two", 2.0).await;
    app.delete("/admin/watches/2", &json!({})).await;

    let third = app.create_watch("Three", 3.0).await;
    assert_eq!(third["id"], 3);
}

#[tokio::test]
async fn test_invalid_watch_is_rejected() {
    let app = TestApp::spawn().await;
    app.create_admin("root", "pw").await;
    app.login_admin("root", "pw").await;

    let resp = app
        .post("/admin/watches", &json!({ "name": " ", "price": 10 }))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(resp).await,
        json!({ "error": "name cannot be empty" })
    );

    let resp = app
        .post("/admin/watches", &json!({ "name": "X", "price": -1 }))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app.post("/admin/watches", &json!({ "name": "X" })).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let watches = json_body(app.get("/watches").await).await;
    assert_eq!(watches, json!([]));
}

#[tokio::test]
async fn test_upload_image_is_served() {
    let app = TestApp::spawn().await;
    app.create_admin("root", "pw").await;
    app.login_admin("root", "pw").await;

    let form = Form::new().part(
        "image",
        Part::bytes(b"PNGDATA".to_vec()).file_name("../../escape/dial.png"),
    );
    let resp = app
        .client
        .post(app.url("/admin/upload-image"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        json_body(resp).await,
        json!({ "message": "Image uploaded successfully" })
    );

    assert_eq!(
        std::fs::read(app.public_dir().join("dial.png")).unwrap(),
        b"PNGDATA"
    );
    let resp = app.get("/dial.png").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"PNGDATA");
}

#[tokio::test]
async fn test_upload_without_image_field() {
    let app = TestApp::spawn().await;
    app.create_admin("root", "pw").await;
    app.login_admin("root", "pw").await;

    let form = Form::new().text("caption", "no file here");
    let resp = app
        .client
        .post(app.url("/admin/upload-image"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await, json!({ "error": "No image uploaded" }));
}
