//! Shared helpers for HTTP-level integration tests.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; the
//! external summarization model is replaced with an in-test implementation.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use knowbase::config::{AppEnv, Config, SummaryConfig};
use knowbase::routes::{self, AppState};
use knowbase::services::summarizer::{SummarizeError, Summarizer, SummaryModel};

pub const PASSWORD: &str = "password123";

/// Summary model that answers with a fixed text and counts its calls.
#[derive(Default)]
pub struct StubModel {
    pub calls: AtomicUsize,
}

#[async_trait]
impl SummaryModel for StubModel {
    async fn summarize(&self, _text: &str) -> Result<String, SummarizeError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("Stub summary {n}"))
    }
}

impl StubModel {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Summary model that is always down, forcing the local fallback.
pub struct DownModel;

#[async_trait]
impl SummaryModel for DownModel {
    async fn summarize(&self, _text: &str) -> Result<String, SummarizeError> {
        Err(SummarizeError::Unavailable("status 503".to_string()))
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "integration-test-secret".to_string(),
        jwt_expires_hours: 1,
        host: "127.0.0.1".to_string(),
        port: 0,
        app_env: AppEnv::Development,
        cors_origin: "http://localhost:3000".to_string(),
        db_max_connections: 5,
        db_acquire_timeout_secs: 2,
        summary: SummaryConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            model: "test/model".to_string(),
            api_key: None,
        },
    }
}

/// Build the full application router (CORS and tracing included) with the given model.
pub fn build_test_app_with_model(pool: SqlitePool, model: Arc<dyn SummaryModel>) -> Router {
    build_test_app_with_config(pool, test_config(), model)
}

/// Build the router with an explicit configuration (e.g. `APP_ENV=production`).
pub fn build_test_app_with_config(
    pool: SqlitePool,
    config: Config,
    model: Arc<dyn SummaryModel>,
) -> Router {
    let state = AppState::new(pool, config, Summarizer::new(model));
    routes::router(state).unwrap()
}

pub fn build_test_app(pool: SqlitePool) -> Router {
    build_test_app_with_model(pool, Arc::new(StubModel::default()))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(app, request(Method::GET, uri, None, None)).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, request(Method::GET, uri, Some(token), None)).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_auth(app: &Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, request(Method::POST, uri, Some(token), Some(body))).await
}

pub async fn put_json_auth(app: &Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, request(Method::DELETE, uri, Some(token), None)).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Pull the `token` value out of a `Set-Cookie` response header.
pub fn cookie_token(response: &Response) -> Option<String> {
    let cookie = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    let (pair, _) = cookie.split_once(';')?;
    pair.strip_prefix("token=").map(str::to_string)
}

/// Register a user through the API and return `(user id, token)`.
pub async fn signup(app: &Router, name: &str, email: &str) -> (i64, String) {
    let body = serde_json::json!({ "name": name, "email": email, "password": PASSWORD });
    let response = post_json(app, "/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let token = cookie_token(&response).expect("signup must set the auth cookie");
    let json = body_json(response).await;
    (json["user"]["id"].as_i64().unwrap(), token)
}

/// Create an article through the API and return its id.
pub async fn create_article(app: &Router, token: &str, title: &str, content: &str) -> i64 {
    let body = serde_json::json!({ "title": title, "content": content });
    let response = post_json_auth(app, "/articles", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["article"]["id"].as_i64().unwrap()
}
