//! # 서비스 계층
//!
//! 라우트 핸들러와 DB 계층 사이의 비즈니스 로직을 담습니다.
//! - `articles`: 문서 작업과 요약 조회/재생성 흐름
//! - `password`: Argon2id 비밀번호 해싱
//! - `summarizer`: 외부 요약 모델 호출과 로컬 폴백
//! - `validation`: 요청 입력 검증

pub mod articles;
pub mod password;
pub mod summarizer;
pub mod validation;
