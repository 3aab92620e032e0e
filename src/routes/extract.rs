//! # 요청 추출기 래퍼
//!
//! axum 기본 `Json`/`Path`/`Query`는 파싱 실패 시 일반 텍스트 응답(422/400)을 돌려줍니다.
//! 아래 래퍼는 같은 추출기를 쓰되 거부(rejection)를 `AppError`로 바꿔서
//! 모든 입력 오류가 `{"error": {"code": "validation_failed", ...}}` 형태로 나가게 합니다.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON 요청 본문. 필드 누락, 타입 불일치, 잘못된 JSON은 400 `validation_failed`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// 경로 파라미터 (예: `/articles/{id}`의 숫자 id)
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// 쿼리 문자열 (예: `?page=&limit=`)
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
