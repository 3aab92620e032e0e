//! # 문서 서비스
//!
//! 저장소(`db::articles`)와 요약기(`Summarizer`)를 묶어 핸들러가 쓰는 작업을 제공합니다.
//! 대부분은 저장소 호출을 그대로 넘기며, 순서가 있는 흐름은 요약 조회/재생성뿐입니다.
//!
//! ## 요약 흐름
//! 1. 문서가 있는지 확인 (없으면 `NotFound`)
//! 2. 저장된 요약이 있으면 `cached = true`로 그대로 반환 (모델 호출 없음)
//! 3. 없으면 `summarize_with_fallback`으로 만들고 upsert 후 `cached = false`로 반환
//!
//! 재생성은 2단계를 건너뛰고 항상 3단계를 수행합니다.

use sqlx::SqlitePool;

use crate::db::articles as db_articles;
use crate::error::AppError;
use crate::models::*;
use crate::services::summarizer::{SummarizeError, Summarizer, MIN_INPUT_CHARS};

#[derive(Clone)]
pub struct ArticleService {
    pool: SqlitePool,
    summarizer: Summarizer,
}

impl ArticleService {
    pub fn new(pool: SqlitePool, summarizer: Summarizer) -> Self {
        Self { pool, summarizer }
    }

    pub async fn list(&self, page: PageRequest) -> Result<(Vec<ArticleListItem>, Pagination), AppError> {
        let items = db_articles::list_page(&self.pool, page.limit, page.offset()).await?;
        let total = db_articles::count(&self.pool).await?;
        Ok((items, Pagination::new(page, total)))
    }

    pub async fn get(&self, id: i64) -> Result<Article, AppError> {
        db_articles::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Article not found".to_string()))
    }

    pub async fn create(&self, req: &CreateArticleRequest, author_id: i64) -> Result<Article, AppError> {
        let article =
            db_articles::create_article(&self.pool, &req.title, &req.content, author_id).await?;
        tracing::info!(article_id = article.id, author_id, "article created");
        Ok(article)
    }

    /// 수정 흐름. 권한 확인과 리비전 기록은 저장소의 트랜잭션 안에서 이루어집니다.
    pub async fn update(
        &self,
        id: i64,
        req: &UpdateArticleRequest,
        caller_id: i64,
    ) -> Result<Article, AppError> {
        let article = db_articles::update_article(
            &self.pool,
            id,
            req.title.as_deref(),
            req.content.as_deref(),
            caller_id,
        )
        .await?;
        tracing::info!(article_id = id, caller_id, "article updated");
        Ok(article)
    }

    pub async fn delete(&self, id: i64, caller_id: i64) -> Result<i64, AppError> {
        let deleted = db_articles::delete_article(&self.pool, id, caller_id).await?;
        tracing::info!(article_id = id, caller_id, "article deleted");
        Ok(deleted)
    }

    pub async fn list_revisions(&self, id: i64, caller_id: i64) -> Result<Vec<Revision>, AppError> {
        db_articles::list_revisions(&self.pool, id, caller_id).await
    }

    /// 검색어는 호출 전에 검증(공백 제거, 비어 있지 않음)되어 있어야 합니다.
    pub async fn search(
        &self,
        term: &str,
        page: PageRequest,
    ) -> Result<(Vec<ArticleListItem>, PageInfo), AppError> {
        let items = db_articles::search(&self.pool, term, page.limit, page.offset()).await?;
        let info = PageInfo::new(page, items.len());
        Ok((items, info))
    }

    pub async fn list_by_author(
        &self,
        author_id: i64,
        page: PageRequest,
    ) -> Result<(Vec<ArticleListItem>, PageInfo), AppError> {
        let items =
            db_articles::list_by_author(&self.pool, author_id, page.limit, page.offset()).await?;
        let info = PageInfo::new(page, items.len());
        Ok((items, info))
    }

    /// 저장된 요약을 돌려주고, 없으면 새로 만들어 저장합니다.
    pub async fn get_or_generate_summary(&self, id: i64) -> Result<SummaryView, AppError> {
        let article = self.get(id).await?;

        if let Some(summary) = db_articles::get_summary(&self.pool, id).await? {
            tracing::debug!(article_id = id, "summary cache hit");
            return Ok(SummaryView::new(summary, true));
        }

        self.generate(&article).await
    }

    /// 저장된 요약을 무시하고 새로 만들어 덮어씁니다.
    pub async fn regenerate_summary(&self, id: i64) -> Result<SummaryView, AppError> {
        let article = self.get(id).await?;
        self.generate(&article).await
    }

    async fn generate(&self, article: &Article) -> Result<SummaryView, AppError> {
        let text = self
            .summarizer
            .summarize_with_fallback(&article.content)
            .await
            .map_err(|e| match e {
                SummarizeError::InvalidInput => AppError::invalid(
                    "content",
                    format!("Article content must be at least {MIN_INPUT_CHARS} characters to summarize"),
                ),
                // 폴백이 나머지 실패를 모두 흡수하므로 여기까지 오지 않습니다.
                other => AppError::UpstreamUnavailable(other.to_string()),
            })?;

        let summary = db_articles::upsert_summary(&self.pool, article.id, &text).await?;
        tracing::info!(article_id = article.id, "summary stored");
        Ok(SummaryView::new(summary, false))
    }
}
