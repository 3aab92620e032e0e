//! # 미들웨어 / 추출기
//!
//! - `auth`: JWT 쿠키/Bearer 인증 추출기와 쿠키 헬퍼

pub mod auth;
