use serde::{Deserialize, Serialize};

/// `?page=&limit=` 쿼리 파라미터 (검증 전 원본 값)
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// `?q=&page=&limit=` 검색 쿼리 파라미터
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// 검증을 통과한 페이지 요청. page는 1부터 시작합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// `validation::page_request`가 곱셈이 넘치는 페이지를 미리 거릅니다.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// 전체 개수를 아는 목록의 페이지 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(request: PageRequest, total: i64) -> Self {
        // 올림 나눗셈: 45개 / 20 → 3페이지
        let total_pages = (total + request.limit - 1) / request.limit;
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }
}

/// 전체 개수를 세지 않는 목록(검색, 작성자별)의 페이지 정보.
/// 결과가 limit만큼 꽉 차 있으면 다음 페이지가 있다고 봅니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: i64,
    pub limit: i64,
    pub has_next: bool,
}

impl PageInfo {
    pub fn new(request: PageRequest, returned: usize) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            has_next: returned as i64 == request.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_five_items_in_pages_of_twenty() {
        let first = Pagination::new(PageRequest { page: 1, limit: 20 }, 45);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next);
        assert!(!first.has_prev);

        let last = Pagination::new(PageRequest { page: 3, limit: 20 }, 45);
        assert!(!last.has_next);
        assert!(last.has_prev);
        assert_eq!(PageRequest { page: 3, limit: 20 }.offset(), 40);
    }

    #[test]
    fn empty_table_has_no_pages() {
        let p = Pagination::new(PageRequest { page: 1, limit: 20 }, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
    }

    #[test]
    fn full_page_suggests_more() {
        let req = PageRequest { page: 2, limit: 5 };
        assert!(PageInfo::new(req, 5).has_next);
        assert!(!PageInfo::new(req, 4).has_next);
    }
}
