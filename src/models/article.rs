use serde::{Deserialize, Serialize};

/// 단일 문서 조회 결과. 작성자 이름을 함께 담습니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub author_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// 문서를 수정/삭제하거나 리비전을 열람할 수 있는지 판단합니다.
///
/// 작성자는 생성 시 정해지고 바뀌지 않으므로, 작성자 본인만 허용합니다.
pub fn can_edit(article: &Article, caller_id: i64) -> bool {
    article.author_id == caller_id
}

/// 목록/검색용 문서. 본문 대신 앞 200자 미리보기(excerpt)만 담습니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArticleListItem {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub author_id: i64,
    pub author_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// 수정 직전의 제목/본문 스냅샷. 생성 후 변경되지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Revision {
    pub id: i64,
    pub article_id: i64,
    pub title: String,
    pub content: String,
    pub created_by: i64,
    pub author_name: Option<String>,
    pub created_at: String,
}

/// 문서당 최대 하나 존재하는 요약. 재생성 시 같은 행이 덮어써집니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Summary {
    pub id: i64,
    pub article_id: i64,
    pub summary: String,
    pub created_at: String,
}

/// 요약 API 응답: `{ "summary": "...", "cached": true, "createdAt": "..." }`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub summary: String,
    pub cached: bool,
    pub created_at: String,
}

impl SummaryView {
    pub fn new(summary: Summary, cached: bool) -> Self {
        Self {
            summary: summary.summary,
            cached,
            created_at: summary.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
}

/// None = 필드 누락 (변경 안 함). 최소 한 필드는 있어야 합니다.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(author_id: i64) -> Article {
        Article {
            id: 1,
            title: "t".into(),
            content: "c".into(),
            author_id,
            author_name: None,
            created_at: "2024-01-01T00:00:00.000Z".into(),
            updated_at: "2024-01-01T00:00:00.000Z".into(),
        }
    }

    #[test]
    fn only_author_can_edit() {
        assert!(can_edit(&article(7), 7));
        assert!(!can_edit(&article(7), 8));
    }
}
