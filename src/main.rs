//! # knowbase 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 연결 풀 생성 및 마이그레이션 실행
//! 4. 요약 모델 클라이언트 생성
//! 5. 라우터 설정 후 HTTP 서버 시작

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use knowbase::{
    config::Config,
    db,
    routes::{self, AppState},
    services::summarizer::{HuggingFaceModel, Summarizer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            // RUST_LOG가 없으면 knowbase, tower_http, axum 모듈을 debug 레벨로 설정
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "knowbase=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("DATABASE_URL and JWT_SECRET must be set")?;
    tracing::info!(
        env = ?config.app_env,
        "Starting knowbase server on {}:{}",
        config.host,
        config.port
    );

    // DB 파일이 들어갈 디렉토리가 없으면 생성합니다 (파일 자체는 sqlx가 만듭니다).
    if let Some(dir) = sqlite_parent_dir(&config.database_url) {
        if !dir.exists() {
            tokio::fs::create_dir_all(dir).await?;
            tracing::info!("Created database directory: {}", dir.display());
        }
    }

    let pool = db::connect(&config).await?;

    if config.summary.api_key.is_none() {
        tracing::warn!("HUGGING_FACE_API_KEY is not set, summaries will use the local fallback");
    }
    let model = HuggingFaceModel::new(&config.summary)?;
    let summarizer = Summarizer::new(Arc::new(model));

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(pool, config, summarizer);
    let app = routes::router(state)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// `sqlite:data/app.db?mode=rwc` 같은 URL에서 DB 파일의 상위 디렉토리를 꺼냅니다.
/// 메모리 DB이거나 상위 디렉토리가 없으면 None입니다.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = path.split('?').next().unwrap_or(path);

    if path.is_empty() || path.contains(":memory:") {
        return None;
    }

    Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}
