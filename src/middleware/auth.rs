//! # 인증 추출기
//!
//! 요청에서 JWT를 찾아 검증하고 현재 사용자를 핸들러에 주입합니다.
//! 토큰은 `token` 쿠키를 먼저 보고, 없으면 `Authorization: Bearer` 헤더를 봅니다.
//!
//! - `AuthUser`: 인증 필수. 실패하면 401
//! - `MaybeAuthUser`: 인증 선택. 실패해도 `None`으로 통과

use axum::{
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::db::users as db_users;
use crate::error::AppError;
use crate::routes::articles::AppState;

/// 인증 쿠키 이름
pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: i64,
    pub iat: i64,
}

/// 인증된 사용자. 토큰이 가리키는 사용자가 DB에 실제로 있어야 합니다.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers).ok_or(AuthError::MissingToken)?;
        let claims = verify_token(&token, &state.config.jwt_secret)?;

        let user_id: i64 = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

        // 토큰 발급 후 삭제된 사용자는 유효하지 않은 토큰으로 취급합니다.
        let user = db_users::find_by_id(&state.pool, user_id)
            .await
            .map_err(AuthError::Lookup)?
            .ok_or(AuthError::InvalidToken)?;

        Ok(AuthUser {
            id: user.id,
            email: user.email,
            name: user.name,
        })
    }
}

/// 선택적 인증. 토큰이 없거나 잘못되어도 요청을 거부하지 않습니다.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    /// 로그인한 요청이면 사용자 id
    pub fn user_id(&self) -> Option<i64> {
        self.0.as_ref().map(|user| user.id)
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(MaybeAuthUser(Some(user))),
            Err(AuthError::MissingToken) => Ok(MaybeAuthUser(None)),
            Err(e) => {
                tracing::debug!(error = ?e, "ignoring invalid optional credentials");
                Ok(MaybeAuthUser(None))
            }
        }
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    /// 사용자 조회 중 DB 오류
    Lookup(AppError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "Authorization token is required",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid authorization token",
            ),
            AuthError::ExpiredToken => (
                StatusCode::UNAUTHORIZED,
                "expired_token",
                "Authorization token has expired",
            ),
            AuthError::Lookup(e) => return e.into_response(),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// 쿠키 헤더에서 `token`을, 없으면 Bearer 헤더에서 토큰을 꺼냅니다.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == TOKEN_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string());

    from_cookie.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    })
}

pub fn create_token(
    user_id: i64,
    secret: &str,
    expires_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(expires_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// 로그인/회원가입 응답에 붙일 `Set-Cookie` 값
pub fn auth_cookie(token: &str, max_age_hours: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{TOKEN_COOKIE}={token}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        max_age_hours * 3600
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// 로그아웃 시 쿠키를 즉시 만료시키는 `Set-Cookie` 값
pub fn clear_cookie(secure: bool) -> String {
    auth_cookie("", 0, secure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trip() {
        let token = create_token(42, SECRET, 1).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "42");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = create_token(42, SECRET, 1).unwrap();
        assert_matches!(verify_token(&token, "other"), Err(AuthError::InvalidToken));
        assert_matches!(verify_token("garbage", SECRET), Err(AuthError::InvalidToken));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        // 기본 leeway(60초)보다 충분히 과거로 만료시킵니다.
        let token = create_token(42, SECRET, -2).unwrap();
        assert_matches!(verify_token(&token, SECRET), Err(AuthError::ExpiredToken));
    }

    #[test]
    fn cookie_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; token=from-cookie"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(extract_token(&headers).as_deref(), Some("from-cookie"));

        headers.remove(COOKIE);
        assert_eq!(extract_token(&headers).as_deref(), Some("from-header"));

        headers.remove(AUTHORIZATION);
        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        let cookie = clear_cookie(true);
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.ends_with("; Secure"));
        assert!(!auth_cookie("abc", 1, false).contains("Secure"));
    }
}
