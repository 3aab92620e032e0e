//! # knowbase
//!
//! 지식 문서(Article) 관리 REST 백엔드입니다.
//! 문서 작성/수정 시 리비전 기록, 검색, 그리고 외부 모델 기반 요약(실패 시 로컬 폴백)을 제공합니다.
//!
//! 바이너리(`main.rs`, `bin/seed.rs`)와 통합 테스트(`tests/`)가 같은 모듈을 쓰도록
//! 라이브러리 크레이트로 공개합니다.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
