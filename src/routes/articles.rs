//! # 문서(Article) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /articles`                    → 문서 목록 (전체 개수 포함 페이지 정보)
//! - `POST   /articles`                    → 새 문서 생성 (로그인 필요)
//! - `GET    /articles/search?q=`          → 제목/본문 검색
//! - `GET    /articles/my/articles`        → 내 문서 목록 (로그인 필요)
//! - `GET    /articles/author/{author_id}` → 작성자별 문서 목록
//! - `GET    /articles/{id}`               → 단일 문서 조회
//! - `PUT    /articles/{id}`               → 문서 수정 (작성자만)
//! - `DELETE /articles/{id}`               → 문서 삭제 (작성자만)
//! - `GET    /articles/{id}/summary`       → 요약 조회 (없으면 생성)
//! - `POST   /articles/{id}/summary`       → 요약 재생성 (로그인 필요)
//! - `GET    /articles/{id}/revisions`     → 리비전 목록 (작성자만)
//!
//! 입력 검증은 서비스 호출 전에 끝내므로, 검증 실패 시 DB에는 아무 작업도 일어나지 않습니다.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    middleware::auth::{AuthUser, MaybeAuthUser},
    models::*,
    routes::extract::{AppJson, AppPath, AppQuery},
    services::{articles::ArticleService, summarizer::Summarizer, validation},
};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 풀과 서비스는 내부적으로 Arc를 쓰므로 clone해도 같은 자원을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub articles: ArticleService,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config, summarizer: Summarizer) -> Self {
        Self {
            articles: ArticleService::new(pool.clone(), summarizer),
            pool,
            config: Arc::new(config),
        }
    }
}

/// `GET /articles`: 최신 문서부터 한 페이지를 조회합니다.
pub async fn list_articles(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    AppQuery(query): AppQuery<PaginationQuery>,
) -> Result<Json<Value>, AppError> {
    let page = validation::page_request(query.page, query.limit, validation::LIST_LIMIT_MAX)?;
    tracing::debug!(viewer = ?viewer.user_id(), page = page.page, "listing articles");
    let (articles, pagination) = state.articles.list(page).await?;
    Ok(Json(json!({ "articles": articles, "pagination": pagination })))
}

/// `GET /articles/{id}`
pub async fn get_article(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    tracing::debug!(article_id = id, viewer = ?viewer.user_id(), "article requested");
    let article = state.articles.get(id).await?;
    Ok(Json(json!({ "article": article })))
}

/// `POST /articles`: 로그인한 사용자를 작성자로 문서를 만듭니다.
pub async fn create_article(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(req): AppJson<CreateArticleRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    validation::validate_create_article(&req)?;
    let article = state.articles.create(&req, user.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Article created successfully", "article": article })),
    ))
}

/// `PUT /articles/{id}`: 수정 직전 상태가 리비전으로 남습니다.
pub async fn update_article(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<UpdateArticleRequest>,
) -> Result<Json<Value>, AppError> {
    validation::validate_update_article(&req)?;
    let article = state.articles.update(id, &req, user.id).await?;
    Ok(Json(json!({ "message": "Article updated successfully", "article": article })))
}

/// `DELETE /articles/{id}`
pub async fn delete_article(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    state.articles.delete(id, user.id).await?;
    Ok(Json(json!({ "message": "Article deleted successfully" })))
}

/// `GET /articles/{id}/summary`: 캐시된 요약이 있으면 그대로, 없으면 생성합니다.
pub async fn get_summary(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<SummaryView>, AppError> {
    tracing::debug!(article_id = id, viewer = ?viewer.user_id(), "summary requested");
    Ok(Json(state.articles.get_or_generate_summary(id).await?))
}

/// `POST /articles/{id}/summary`: 캐시를 무시하고 요약을 다시 만듭니다.
pub async fn regenerate_summary(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<SummaryView>, AppError> {
    tracing::debug!(article_id = id, user_id = user.id, "summary regeneration requested");
    Ok(Json(state.articles.regenerate_summary(id).await?))
}

/// `GET /articles/{id}/revisions`
pub async fn list_revisions(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    let revisions = state.articles.list_revisions(id, user.id).await?;
    Ok(Json(json!({ "revisions": revisions })))
}

/// `GET /articles/search?q=&page=&limit=`
pub async fn search_articles(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    AppQuery(query): AppQuery<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    let (term, page) = validation::search_request(&query)?;
    tracing::debug!(viewer = ?viewer.user_id(), term = %term, "searching articles");
    let (articles, pagination) = state.articles.search(&term, page).await?;
    Ok(Json(json!({
        "articles": articles,
        "searchQuery": term,
        "pagination": pagination,
    })))
}

/// `GET /articles/author/{author_id}`
pub async fn list_by_author(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    AppPath(author_id): AppPath<i64>,
    AppQuery(query): AppQuery<PaginationQuery>,
) -> Result<Json<Value>, AppError> {
    let page = validation::page_request(query.page, query.limit, validation::LIST_LIMIT_MAX)?;
    tracing::debug!(author_id, viewer = ?viewer.user_id(), "listing articles by author");
    let (articles, pagination) = state.articles.list_by_author(author_id, page).await?;
    Ok(Json(json!({
        "articles": articles,
        "authorId": author_id,
        "pagination": pagination,
    })))
}

/// `GET /articles/my/articles`
pub async fn my_articles(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<PaginationQuery>,
) -> Result<Json<Value>, AppError> {
    let page = validation::page_request(query.page, query.limit, validation::LIST_LIMIT_MAX)?;
    let (articles, pagination) = state.articles.list_by_author(user.id, page).await?;
    Ok(Json(json!({ "articles": articles, "pagination": pagination })))
}
