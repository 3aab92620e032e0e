//! # 인증 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST /auth/signup`          → 회원가입 후 인증 쿠키 설정 (201)
//! - `POST /auth/login`           → 로그인 후 인증 쿠키 설정
//! - `POST /auth/logout`          → 인증 쿠키 만료
//! - `GET  /auth/profile`         → 내 정보
//! - `PUT  /auth/profile`         → 이름/이메일 변경
//! - `POST /auth/change-password` → 비밀번호 변경

use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    Json,
};
use serde_json::{json, Value};

use crate::{
    db::users as db_users,
    error::AppError,
    middleware::auth::{auth_cookie, clear_cookie, create_token, AuthUser},
    models::user::*,
    routes::{articles::AppState, extract::AppJson},
    services::{password, validation},
};

type WithCookie<T> = ([(axum::http::HeaderName, String); 1], Json<T>);

/// 사용자 id로 토큰을 발급하고 `Set-Cookie` 값을 만듭니다.
fn issue_cookie(state: &AppState, user_id: i64) -> Result<String, AppError> {
    let config = &state.config;
    let token = create_token(user_id, &config.jwt_secret, config.jwt_expires_hours)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;
    Ok(auth_cookie(
        &token,
        config.jwt_expires_hours,
        config.app_env.is_production(),
    ))
}

pub async fn signup(
    State(state): State<AppState>,
    AppJson(req): AppJson<SignupRequest>,
) -> Result<(StatusCode, WithCookie<AuthResponse>), AppError> {
    validation::validate_signup(&req)?;

    if db_users::find_by_email(&state.pool, &req.email).await?.is_some() {
        return Err(AppError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.password)?;
    // 동시에 같은 이메일로 가입하면 UNIQUE 제약이 409로 막습니다.
    let user = db_users::create_user(&state.pool, &req.email, &req.name, &password_hash).await?;
    tracing::info!(user_id = user.id, "user registered");

    let cookie = issue_cookie(&state, user.id)?;
    Ok((
        StatusCode::CREATED,
        (
            [(SET_COOKIE, cookie)],
            Json(AuthResponse {
                message: "User registered successfully".to_string(),
                user: user.into(),
            }),
        ),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<WithCookie<AuthResponse>, AppError> {
    validation::validate_login(&req)?;

    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = db_users::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    let cookie = issue_cookie(&state, user.id)?;
    Ok((
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            message: "Login successful".to_string(),
            user: user.into(),
        }),
    ))
}

/// 토큰은 서버에 저장하지 않으므로 쿠키만 지웁니다.
pub async fn logout(State(state): State<AppState>) -> WithCookie<Value> {
    (
        [(SET_COOKIE, clear_cookie(state.config.app_env.is_production()))],
        Json(json!({ "message": "Logout successful" })),
    )
}

pub async fn profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let user = db_users::find_by_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({ "user": UserResponse::from(user) })))
}

pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> Result<Json<Value>, AppError> {
    validation::validate_profile_update(&req)?;

    if let Some(email) = &req.email {
        if let Some(existing) = db_users::find_by_email(&state.pool, email).await? {
            if existing.id != user.id {
                return Err(AppError::Conflict("Email is already taken".to_string()));
            }
        }
    }

    let updated = db_users::update_profile(
        &state.pool,
        user.id,
        req.name.as_deref(),
        req.email.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": UserResponse::from(updated),
    })))
}

pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(req): AppJson<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    validation::validate_change_password(&req)?;

    let stored = db_users::find_by_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !password::verify_password(&req.current_password, &stored.password_hash)? {
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let new_hash = password::hash_password(&req.new_password)?;
    db_users::update_password(&state.pool, user.id, &new_hash).await?;
    tracing::info!(user_id = user.id, "password changed");

    Ok(Json(json!({ "message": "Password changed successfully" })))
}
