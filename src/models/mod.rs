//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `article`: 문서(Article), 리비전(Revision), 요약(Summary) 관련 구조체
//! - `pagination`: 페이지 요청/응답 구조체
//! - `user`: 사용자(User) 관련 구조체
//!
//! `pub use X::*;`는 하위 모듈의 모든 공개 항목을
//! 이 모듈에서 바로 접근할 수 있게 재공개(re-export)합니다.
//! 예: `crate::models::article::Article` 대신 `crate::models::Article`로 접근 가능

pub mod article;
pub mod pagination;
pub mod user;

pub use article::*;
pub use pagination::*;
pub use user::*;
