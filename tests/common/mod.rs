#![allow(dead_code)]

use std::path::PathBuf;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::{ContentMigrator, InteractionMigrator, UserMigrator};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use streamflix::{
    api,
    config::sqlite_url,
    db::connect_and_migrate,
    stores::{ContentStore, InteractionStore, UserStore},
};
use tower::ServiceExt;

/// A SQLite file that is removed when the test ends.
pub struct TempDb {
    path: PathBuf,
}

impl TempDb {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("streamflix-test-{}.db", uuid::Uuid::new_v4()));
        Self { path }
    }

    pub fn url(&self) -> String {
        sqlite_url(&self.path.to_string_lossy())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.path.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

pub async fn content_store() -> (ContentStore, TempDb) {
    let tmp = TempDb::new();
    let db = connect_and_migrate::<ContentMigrator>(&tmp.url(), 5).await.unwrap();
    (ContentStore::new(db), tmp)
}

pub async fn user_store() -> (UserStore, TempDb) {
    let tmp = TempDb::new();
    let db = connect_and_migrate::<UserMigrator>(&tmp.url(), 5).await.unwrap();
    (UserStore::new(db), tmp)
}

pub async fn interaction_store() -> (InteractionStore, TempDb) {
    let tmp = TempDb::new();
    let db: DatabaseConnection =
        connect_and_migrate::<InteractionMigrator>(&tmp.url(), 5).await.unwrap();
    (InteractionStore::new(db), tmp)
}

pub async fn content_app() -> (Router, TempDb) {
    let (store, tmp) = content_store().await;
    (api::content_router(store), tmp)
}

pub async fn users_app() -> (Router, TempDb) {
    let (store, tmp) = user_store().await;
    (api::users_router(store), tmp)
}

pub async fn interactions_app() -> (Router, TempDb) {
    let (store, tmp) = interaction_store().await;
    (api::interactions_router(store), tmp)
}

/// Sends a JSON request and decodes the JSON answer (`Value::Null` when empty).
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

/// Sends a request and returns the body as text, for the HTML gateway.
pub async fn fetch_html(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn get_html(app: &Router, uri: &str) -> (StatusCode, String) {
    fetch_html(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_form(app: &Router, uri: &str, form: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    fetch_html(app, request).await
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Nothing listens here, so every call fails at connect time.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";
