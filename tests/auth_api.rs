//! HTTP-level integration tests for signup, login, logout and profile endpoints.

mod common;

use axum::body::Body;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{Request, StatusCode};
use common::{body_json, get, get_auth, post_json, post_json_auth, put_json_auth, signup, PASSWORD};
use serde_json::json;
use sqlx::SqlitePool;

#[sqlx::test]
async fn signup_sets_cookie_and_returns_user(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let body = json!({ "name": "John Doe", "email": "john@example.com", "password": PASSWORD });
    let response = post_json(&app, "/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap().to_string();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));

    let json = body_json(response).await;
    assert_eq!(json["user"]["email"], "john@example.com");
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test]
async fn duplicate_signup_is_conflict(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    signup(&app, "John", "john@example.com").await;

    let body = json!({ "name": "Other", "email": "john@example.com", "password": PASSWORD });
    let response = post_json(&app, "/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"]["code"], "conflict");
}

#[sqlx::test]
async fn signup_collects_every_invalid_field(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let body = json!({ "name": "J", "email": "not-an-email", "password": "123" });
    let response = post_json(&app, "/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "validation_failed");
    let fields: Vec<&str> = json["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email", "password"]);
}

#[sqlx::test]
async fn login_checks_password(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    signup(&app, "John", "john@example.com").await;

    let wrong = json!({ "email": "john@example.com", "password": "wrong-password" });
    let response = post_json(&app, "/auth/login", wrong).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let unknown = json!({ "email": "nobody@example.com", "password": PASSWORD });
    let response = post_json(&app, "/auth/login", unknown).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let right = json!({ "email": "john@example.com", "password": PASSWORD });
    let response = post_json(&app, "/auth/login", right).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(common::cookie_token(&response).is_some());
}

#[sqlx::test]
async fn profile_accepts_cookie_or_bearer(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let (id, token) = signup(&app, "John", "john@example.com").await;

    let response = get_auth(&app, "/auth/profile", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["user"]["id"], id);

    let request = Request::builder()
        .uri("/auth/profile")
        .header(COOKIE, format!("token={token}"))
        .body(Body::empty())
        .unwrap();
    let response = common::send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test]
async fn profile_without_token_is_unauthorized(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = get(&app, "/auth/profile").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"]["code"], "missing_token");

    let response = get_auth(&app, "/auth/profile", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"]["code"], "invalid_token");
}

#[sqlx::test]
async fn token_of_deleted_user_is_rejected(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone());
    let (id, token) = signup(&app, "John", "john@example.com").await;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let response = get_auth(&app, "/auth/profile", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"]["code"], "invalid_token");
}

#[sqlx::test]
async fn profile_update_rejects_taken_email(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    signup(&app, "Jane", "jane@example.com").await;
    let (_, token) = signup(&app, "John", "john@example.com").await;

    let response = put_json_auth(&app, "/auth/profile", &token, json!({ "email": "jane@example.com" })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = put_json_auth(&app, "/auth/profile", &token, json!({ "name": "Johnny" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["name"], "Johnny");
    assert_eq!(json["user"]["email"], "john@example.com");

    let response = put_json_auth(&app, "/auth/profile", &token, json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn change_password_requires_current_password(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let (_, token) = signup(&app, "John", "john@example.com").await;

    let wrong = json!({ "currentPassword": "nope-nope", "newPassword": "newpassword1" });
    let response = post_json_auth(&app, "/auth/change-password", &token, wrong).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let right = json!({ "currentPassword": PASSWORD, "newPassword": "newpassword1" });
    let response = post_json_auth(&app, "/auth/change-password", &token, right).await;
    assert_eq!(response.status(), StatusCode::OK);

    let login = json!({ "email": "john@example.com", "password": "newpassword1" });
    assert_eq!(post_json(&app, "/auth/login", login).await.status(), StatusCode::OK);
}

#[sqlx::test]
async fn logout_expires_cookie(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = post_json(&app, "/auth/logout", json!({})).await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[sqlx::test]
async fn health_reports_database(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = get(&app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["database"], "connected");
    assert!(json["timestamp"].is_string());
}
