//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 서비스(services/)와 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출합니다.
//!
//! 각 하위 모듈:
//! - `articles`: 문서 CRUD, 리비전, 요약, 검색 쿼리
//! - `users`: 사용자 계정 관련 쿼리

pub mod articles;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::Config;

/// 설정값으로 연결 풀을 만들고 마이그레이션을 적용합니다.
pub async fn connect(config: &Config) -> anyhow::Result<SqlitePool> {
    connect_with(
        &config.database_url,
        config.db_max_connections,
        Duration::from_secs(config.db_acquire_timeout_secs),
    )
    .await
}

/// URL로 직접 연결 풀을 만듭니다 (시드 스크립트처럼 전체 설정이 필요 없는 경우).
///
/// DB 파일이 없으면 새로 만들고, 외래 키 제약(ON DELETE CASCADE)을 켭니다.
pub async fn connect_with(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect_with(options)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
