//! End-to-end tests for the Watchshop storefront.
//!
//! Each test starts the real router on an ephemeral port with its own
//! temporary data and public directories, then talks to it over HTTP with a
//! cookie-keeping client. No external services are needed:
//!
//! ```bash
//! cargo test -p watchshop-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::{Client, Response};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;

use watchshop_storefront::config::StorefrontConfig;
use watchshop_storefront::db::WatchRepository;
use watchshop_storefront::models::{Address, WatchDraft};
use watchshop_storefront::services::AuthService;
use watchshop_storefront::state::AppState;

/// A running storefront plus a client with its own cookie jar.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: AppState,
    _dir: TempDir,
}

impl TestApp {
    /// Start a server on `127.0.0.1:0` backed by fresh directories.
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_dir = dir.path().join("data");
        let public_dir = dir.path().join("public");
        std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");
        std::fs::create_dir_all(&public_dir).expect("Failed to create public dir");

        let data = data_dir.display().to_string();
        let public = public_dir.display().to_string();
        let config = StorefrontConfig::from_lookup(|key| match key {
            "WATCHSHOP_DATA_DIR" => Some(data.clone()),
            "WATCHSHOP_PUBLIC_DIR" => Some(public.clone()),
            _ => None,
        })
        .expect("Failed to build config");

        let state = AppState::new(config);
        let router = watchshop_storefront::app(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server failed");
        });

        Self {
            addr,
            client: new_client(),
            state,
            _dir: dir,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Data directory the server reads and writes.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.state.config().data_dir.clone()
    }

    /// Directory uploads are written to.
    #[must_use]
    pub fn public_dir(&self) -> PathBuf {
        self.state.config().public_dir.clone()
    }

    /// A second client with an empty cookie jar.
    #[must_use]
    pub fn other_client(&self) -> Client {
        new_client()
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    pub async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST failed")
    }

    pub async fn put(&self, path: &str, body: &Value) -> Response {
        self.client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("PUT failed")
    }

    pub async fn delete(&self, path: &str, body: &Value) -> Response {
        self.client
            .delete(self.url(path))
            .json(body)
            .send()
            .await
            .expect("DELETE failed")
    }

    /// Register through the API and return the new user's id.
    pub async fn register(&self, username: &str, password: &str) -> i64 {
        let resp = self
            .post(
                "/register",
                &json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(resp.status(), 201, "registration failed");
        let body: Value = resp.json().await.expect("Invalid JSON");
        body["user"]["id"].as_i64().expect("Missing user id")
    }

    /// Register and log in on this client; returns the user id.
    pub async fn login_new_user(&self, username: &str, password: &str) -> i64 {
        let id = self.register(username, password).await;
        let resp = self
            .post(
                "/login",
                &json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(resp.status(), 200, "login failed");
        id
    }

    /// Create an entry in `admins.json` directly.
    pub async fn create_admin(&self, username: &str, password: &str) {
        AuthService::new(self.state.users(), self.state.admins())
            .create_admin(username, password)
            .await
            .expect("Failed to create admin");
    }

    /// Create a user with `isAdmin: true`, bypassing `/register`.
    pub async fn create_admin_user(&self, username: &str, password: &str) {
        AuthService::new(self.state.users(), self.state.admins())
            .register_with_password(username, password, Address::default(), true)
            .await
            .expect("Failed to create admin user");
    }

    /// Log this client in through `/admin/login`.
    pub async fn login_admin(&self, username: &str, password: &str) {
        let resp = self
            .post(
                "/admin/login",
                &json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(resp.status(), 200, "admin login failed");
    }

    /// Insert a watch straight into the catalog and return its id.
    pub async fn seed_watch(&self, name: &str, price: f64) -> i64 {
        let draft: WatchDraft = serde_json::from_value(json!({ "name": name, "price": price }))
            .expect("Invalid watch draft");
        let watch = WatchRepository::new(self.state.watches())
            .create(draft)
            .await
            .expect("Failed to seed watch");
        i64::from(watch.id.as_i32())
    }

    /// Create a watch through the admin API; the client must be an admin.
    pub async fn create_watch(&self, name: &str, price: f64) -> Value {
        let resp = self
            .post(
                "/admin/watches",
                &json!({
                    "name": name,
                    "collection": "Test",
                    "price": price,
                    "img": "test.png",
                    "description": "A test watch",
                }),
            )
            .await;
        assert_eq!(resp.status(), 201, "watch creation failed");
        resp.json().await.expect("Invalid JSON")
    }
}

fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Read a response body as JSON.
pub async fn json_body(resp: Response) -> Value {
    resp.json().await.expect("Invalid JSON body")
}
