//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//! - sqlx 제약 조건 위반(unique, foreign key, not null)을 409/400으로 분류
//! - 요청 추출기(Json/Path/Query) 거부를 400 `validation_failed`로 변환

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,                   // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response}, // Axum의 응답 변환 트레이트
    Json,                               // JSON 응답 래퍼
};
use serde::Serialize;
use serde_json::{json, Value}; // json! 매크로: JSON 객체를 간편하게 생성
use sqlx::error::ErrorKind;
use thiserror::Error; // thiserror: 커스텀 에러 타입을 쉽게 만들어주는 매크로 크레이트

/// 5xx 응답에 함께 실리는 내부 에러 내용 (응답 extension)
///
/// 본문에는 들어가지 않습니다. 개발 환경 라우터에만 붙는
/// [`expose_internal_details`]가 이 값을 `details`로 옮깁니다.
#[derive(Debug, Clone)]
pub struct InternalDetail {
    code: &'static str,
    message: String,
    detail: String,
}

/// 입력 검증 실패 시 필드별 에러 메시지
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    #[error("{0}")]
    NotFound(String),

    /// 인증되지 않음 (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 인증은 되었지만 권한이 없음 (HTTP 403)
    /// 예: 작성자가 아닌 사용자가 문서를 수정하려는 경우
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 입력 검증 실패 (HTTP 400)
    /// 필드별 에러 목록을 `details`로 함께 돌려줍니다.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 리소스 충돌 (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 외부 요약 서비스 장애 (HTTP 503)
    /// 폴백을 거치는 경로에서는 호출자에게 도달하지 않습니다.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류
    /// #[from]: sqlx::Error를 AppError로 자동 변환하는 From 트레이트를 구현합니다.
    /// 이를 통해 sqlx 함수에서 반환된 에러에 `?` 연산자를 사용하면
    /// 자동으로 AppError::Database로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// 필드 하나짜리 검증 에러를 만듭니다.
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }

    /// 이 에러가 응답될 HTTP 상태 코드
    pub fn status(&self) -> StatusCode {
        self.classify().0
    }

    /// (상태 코드, 에러 코드, 사용자에게 보여줄 메시지)로 분류합니다.
    fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "validation_failed",
                "Please check your input and try again".to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::UpstreamUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "upstream_unavailable",
                msg.clone(),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
            AppError::Database(e) => classify_sqlx_error(e),
        }
    }
}

/// sqlx 에러를 HTTP 상태로 분류합니다.
///
/// - `RowNotFound` → 404
/// - unique 제약 위반 → 409
/// - foreign key / not null / check 제약 위반 → 400
/// - 그 외 → 500 (메시지는 숨김)
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "not_found",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => match db_err.kind() {
            ErrorKind::UniqueViolation => (
                StatusCode::CONFLICT,
                "conflict",
                "Resource already exists".to_string(),
            ),
            ErrorKind::ForeignKeyViolation => (
                StatusCode::BAD_REQUEST,
                "validation_failed",
                "Referenced resource does not exist".to_string(),
            ),
            ErrorKind::NotNullViolation | ErrorKind::CheckViolation => (
                StatusCode::BAD_REQUEST,
                "validation_failed",
                "Missing or invalid required field".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "A database error occurred".to_string(),
            ),
        },
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "database_error",
            "A database error occurred".to_string(),
        ),
    }
}

/// 추출기 거부 메시지를 필드 하나짜리 검증 에러로 바꿉니다.
fn invalid_request(field: &str, body_text: String) -> AppError {
    AppError::invalid(field, body_text)
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        invalid_request("body", rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        invalid_request("path", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        invalid_request("query", rejection.body_text())
    }
}

/// 결과: `{ "error": { "code": "not_found", "message": "...", "details": ... } }`
fn error_body(code: &str, message: &str, details: Option<Value>) -> Value {
    let mut error = json!({
        "code": code,
        "message": message,
    });
    if let Some(details) = details {
        error["details"] = details;
    }
    json!({ "error": error })
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Internal)는 실제 에러 내용을 로그에 기록하고,
    /// 본문에는 일반적인 메시지만 싣습니다. 원문은 [`InternalDetail`]로 응답에 붙습니다.
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();

        // 서버 쪽 원인은 항상 로그로 남깁니다.
        if status.is_server_error() {
            tracing::error!(error = %self, code, "request failed");
        }

        let details = match &self {
            AppError::Validation(fields) => Some(json!(fields)),
            _ => None,
        };

        let mut response = (status, Json(error_body(code, &message, details))).into_response();
        let internal = matches!(self, AppError::Internal(_) | AppError::Database(_));
        if status.is_server_error() && internal {
            response.extensions_mut().insert(InternalDetail {
                code,
                message,
                detail: self.to_string(),
            });
        }
        response
    }
}

/// 개발 환경 전용 응답 매퍼: 내부 에러 원문을 `details`에 실어 본문을 다시 만듭니다.
///
/// `routes::router`가 `APP_ENV`가 production이 아닐 때만 레이어로 붙입니다.
pub async fn expose_internal_details(mut response: Response) -> Response {
    match response.extensions_mut().remove::<InternalDetail>() {
        Some(InternalDetail {
            code,
            message,
            detail,
        }) => {
            let status = response.status();
            (status, Json(error_body(code, &message, Some(json!(detail))))).into_response()
        }
        None => response,
    }
}
