//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 전체 라우터 구성을 담습니다.
//!
//! 각 하위 모듈:
//! - `articles`: 문서 CRUD, 검색, 요약, 리비전 핸들러 (+ `AppState`)
//! - `auth`: 회원가입, 로그인, 로그아웃, 프로필
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `extract`: 파싱 실패를 `AppError`로 돌려주는 `Json`/`Path`/`Query` 래퍼

pub mod articles;
pub mod auth;
pub mod extract;
pub mod health;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware::map_response,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error;

pub use articles::AppState;

/// 모든 라우트와 미들웨어(CORS, 요청 로깅)를 묶은 라우터를 만듭니다.
///
/// 라우트는 서버 루트에 바로 붙습니다 (예: `/articles`, `/auth/login`).
/// production이 아니면 5xx 응답 본문에 내부 에러 원문을 덧붙입니다.
pub fn router(state: AppState) -> anyhow::Result<Router> {
    let expose_internal = !state.config.app_env.is_production();

    let auth_routes = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/profile", get(auth::profile).put(auth::update_profile))
        .route("/auth/change-password", post(auth::change_password));

    // 고정 경로(`/articles/search`, `/articles/my/articles`)가 `{id}`보다 우선 매칭됩니다.
    let article_routes = Router::new()
        .route(
            "/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route("/articles/search", get(articles::search_articles))
        .route("/articles/my/articles", get(articles::my_articles))
        .route("/articles/author/{author_id}", get(articles::list_by_author))
        .route(
            "/articles/{id}",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .route(
            "/articles/{id}/summary",
            get(articles::get_summary).post(articles::regenerate_summary),
        )
        .route("/articles/{id}/revisions", get(articles::list_revisions));

    // 쿠키 인증을 쓰므로 와일드카드 대신 프론트엔드 출처 하나만 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(state.config.cors_origin.parse::<HeaderValue>()?)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let mut app = Router::new()
        .merge(auth_routes)
        .merge(article_routes)
        .route("/health", get(health::health_check))
        .with_state(state);
    if expose_internal {
        app = app.layer(map_response(error::expose_internal_details));
    }

    Ok(app.layer(cors).layer(TraceLayer::new_for_http()))
}
