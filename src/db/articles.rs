//! # 문서(Article) 데이터베이스 쿼리 모듈
//!
//! `articles`, `article_revisions`, `article_summaries` 테이블에 대한
//! 쿼리 함수들이 정의되어 있습니다. 세 테이블의 영속성은 이 모듈만 다룹니다.
//!
//! 모든 함수는 `async`이며 `SqlitePool`을 받아 데이터베이스와 상호작용합니다.
//! 풀에서 연결을 빌려 쓰고 함수가 끝나면 곧바로 반납합니다.
//!
//! ## 정렬 규칙
//! 목록은 `created_at DESC, id DESC` 순서입니다.
//! 생성 시각이 같은 행은 id가 큰(나중에 생성된) 행이 먼저 옵니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::{SqliteExecutor, SqlitePool};

/// 목록 미리보기(excerpt)에 포함할 최대 글자 수
pub const EXCERPT_CHARS: i64 = 200;

/// 새 문서를 생성합니다.
///
/// `author_id`가 존재하지 않는 사용자이면 외래 키 제약 위반
/// (`AppError::Database`, HTTP 400)으로 실패합니다.
pub async fn create_article(
    pool: &SqlitePool,
    title: &str,
    content: &str,
    author_id: i64,
) -> Result<Article, AppError> {
    // RETURNING: 삽입된 행의 id를 바로 돌려받습니다 (SQLite 3.35+)
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO articles (title, content, title_folded, content_folded, created_by)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(fold(title))
    .bind(fold(content))
    .bind(author_id)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created article".to_string()))
}

/// ID로 단일 문서를 작성자 이름과 함께 조회합니다.
///
/// # 반환값
/// - `Ok(Some(Article))`: 문서를 찾은 경우
/// - `Ok(None)`: 해당 ID의 문서가 없는 경우 (에러가 아님)
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Article>, AppError> {
    Ok(fetch_article(pool, id).await?)
}

/// 풀과 트랜잭션 양쪽에서 쓸 수 있도록 실행기(executor)를 일반화한 조회
async fn fetch_article(
    executor: impl SqliteExecutor<'_>,
    id: i64,
) -> Result<Option<Article>, sqlx::Error> {
    sqlx::query_as::<_, Article>(
        r#"
        SELECT a.id, a.title, a.content, a.created_by AS author_id,
               u.name AS author_name, a.created_at, a.updated_at
        FROM articles a
        LEFT JOIN users u ON a.created_by = u.id
        WHERE a.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// 최신 문서부터 한 페이지를 조회합니다.
pub async fn list_page(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<ArticleListItem>, AppError> {
    let articles = sqlx::query_as::<_, ArticleListItem>(
        r#"
        SELECT a.id, a.title, substr(a.content, 1, ?) AS excerpt,
               a.created_by AS author_id, u.name AS author_name,
               a.created_at, a.updated_at
        FROM articles a
        LEFT JOIN users u ON a.created_by = u.id
        ORDER BY a.created_at DESC, a.id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(EXCERPT_CHARS)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(articles)
}

/// 전체 문서 수 (페이지 계산용)
pub async fn count(pool: &SqlitePool) -> Result<i64, AppError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
        .fetch_one(pool)
        .await?;
    Ok(total)
}

/// 문서를 수정합니다. 수정 직전 상태를 리비전으로 먼저 남깁니다.
///
/// ## 처리 흐름 (하나의 트랜잭션)
/// 1. 현재 문서를 읽습니다. 없으면 `NotFound`
/// 2. 요청자가 작성자가 아니면 `Forbidden`
/// 3. **현재(수정 전)** 제목/본문으로 리비전을 삽입합니다
/// 4. 리비전 삽입이 성공한 뒤에만 문서를 덮어쓰고 `updated_at`을 갱신합니다
///
/// 중간에 `?`로 빠져나가면 `tx`가 drop되면서 자동으로 롤백됩니다.
/// `new_title`/`new_content`가 None이면 해당 필드는 현재 값을 유지합니다.
pub async fn update_article(
    pool: &SqlitePool,
    id: i64,
    new_title: Option<&str>,
    new_content: Option<&str>,
    requesting_user_id: i64,
) -> Result<Article, AppError> {
    let mut tx = pool.begin().await?;

    let current = fetch_article(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Article not found".to_string()))?;

    if !can_edit(&current, requesting_user_id) {
        return Err(AppError::Forbidden(
            "Only the author can edit this article".to_string(),
        ));
    }

    sqlx::query(
        r#"
        INSERT INTO article_revisions (article_id, title, content, created_by)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(&current.title)
    .bind(&current.content)
    .bind(requesting_user_id)
    .execute(&mut *tx)
    .await?;

    let title = new_title.unwrap_or(&current.title);
    let content = new_content.unwrap_or(&current.content);
    sqlx::query(
        r#"
        UPDATE articles
        SET title = ?, content = ?, title_folded = ?, content_folded = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(fold(title))
    .bind(fold(content))
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let updated = fetch_article(&mut *tx, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve updated article".to_string()))?;

    tx.commit().await?;
    Ok(updated)
}

/// 문서를 삭제하고 삭제된 id를 반환합니다.
///
/// 스키마의 `ON DELETE CASCADE`로 리비전과 요약도 함께 삭제됩니다.
pub async fn delete_article(
    pool: &SqlitePool,
    id: i64,
    requesting_user_id: i64,
) -> Result<i64, AppError> {
    let article = find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Article not found".to_string()))?;

    if !can_edit(&article, requesting_user_id) {
        return Err(AppError::Forbidden(
            "Only the author can delete this article".to_string(),
        ));
    }

    let result = sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    // 확인과 삭제 사이에 다른 요청이 먼저 지웠을 수 있습니다.
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Article not found".to_string()));
    }

    Ok(id)
}

/// 문서의 리비전 목록을 최신순으로 조회합니다. 작성자만 볼 수 있습니다.
pub async fn list_revisions(
    pool: &SqlitePool,
    article_id: i64,
    requesting_user_id: i64,
) -> Result<Vec<Revision>, AppError> {
    let article = find_by_id(pool, article_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Article not found".to_string()))?;

    if !can_edit(&article, requesting_user_id) {
        return Err(AppError::Forbidden(
            "Only the author can view revision history".to_string(),
        ));
    }

    let revisions = sqlx::query_as::<_, Revision>(
        r#"
        SELECT r.id, r.article_id, r.title, r.content, r.created_by,
               u.name AS author_name, r.created_at
        FROM article_revisions r
        LEFT JOIN users u ON r.created_by = u.id
        WHERE r.article_id = ?
        ORDER BY r.created_at DESC, r.id DESC
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await?;

    Ok(revisions)
}

/// 요약을 저장합니다. 이미 있으면 같은 행의 본문과 시각을 교체합니다.
///
/// `article_id`의 UNIQUE 제약을 충돌 대상으로 쓰는 upsert이므로
/// 한 문서에 요약 행이 두 개 생기지 않습니다.
pub async fn upsert_summary(
    pool: &SqlitePool,
    article_id: i64,
    text: &str,
) -> Result<Summary, AppError> {
    let summary = sqlx::query_as::<_, Summary>(
        r#"
        INSERT INTO article_summaries (article_id, summary)
        VALUES (?, ?)
        ON CONFLICT (article_id) DO UPDATE SET
            summary = excluded.summary,
            created_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        RETURNING id, article_id, summary, created_at
        "#,
    )
    .bind(article_id)
    .bind(text)
    .fetch_one(pool)
    .await?;

    Ok(summary)
}

pub async fn get_summary(pool: &SqlitePool, article_id: i64) -> Result<Option<Summary>, AppError> {
    let summary = sqlx::query_as::<_, Summary>(
        r#"
        SELECT id, article_id, summary, created_at
        FROM article_summaries
        WHERE article_id = ?
        "#,
    )
    .bind(article_id)
    .fetch_optional(pool)
    .await?;

    Ok(summary)
}

/// 제목 또는 본문에 검색어가 포함된 문서를 찾습니다 (대소문자 무시).
///
/// 순위 계산이나 토큰화 없이 단순 부분 문자열 일치만 봅니다.
/// 비교는 저장 시 [`fold`]로 만들어 둔 소문자 사본끼리 하므로 `Ü`/`ü` 같은
/// ASCII 밖의 대소문자도 같게 취급됩니다.
/// 검색어 안의 `%`, `_`, `\`는 LIKE 와일드카드로 해석되지 않도록 이스케이프합니다.
pub async fn search(
    pool: &SqlitePool,
    term: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<ArticleListItem>, AppError> {
    let pattern = format!("%{}%", escape_like(&fold(term)));

    let articles = sqlx::query_as::<_, ArticleListItem>(
        r#"
        SELECT a.id, a.title, substr(a.content, 1, ?) AS excerpt,
               a.created_by AS author_id, u.name AS author_name,
               a.created_at, a.updated_at
        FROM articles a
        LEFT JOIN users u ON a.created_by = u.id
        WHERE a.title_folded LIKE ? ESCAPE '\'
           OR a.content_folded LIKE ? ESCAPE '\'
        ORDER BY a.created_at DESC, a.id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(EXCERPT_CHARS)
    .bind(&pattern)
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(articles)
}

/// 특정 작성자의 문서를 최신순으로 조회합니다.
pub async fn list_by_author(
    pool: &SqlitePool,
    author_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<ArticleListItem>, AppError> {
    let articles = sqlx::query_as::<_, ArticleListItem>(
        r#"
        SELECT a.id, a.title, substr(a.content, 1, ?) AS excerpt,
               a.created_by AS author_id, u.name AS author_name,
               a.created_at, a.updated_at
        FROM articles a
        LEFT JOIN users u ON a.created_by = u.id
        WHERE a.created_by = ?
        ORDER BY a.created_at DESC, a.id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(EXCERPT_CHARS)
    .bind(author_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(articles)
}

/// 검색 비교용 유니코드 소문자 변환 (저장과 검색 양쪽에서 같은 규칙)
fn fold(text: &str) -> String {
    text.to_lowercase()
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
