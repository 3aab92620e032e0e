//! # 입력 검증
//!
//! 요청 본문과 쿼리 파라미터를 DB 작업 전에 검사합니다.
//! 첫 에러에서 멈추지 않고 모든 필드의 에러를 모아 `AppError::Validation`으로 돌려줍니다.
//! 길이는 바이트가 아닌 문자(char) 수로 셉니다.

use crate::error::{AppError, FieldError};
use crate::models::*;

pub const TITLE_MAX: usize = 255;
pub const CONTENT_MIN: usize = 10;
pub const CONTENT_MAX: usize = 10_000;
pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 100;
pub const QUERY_MAX: usize = 100;

pub const DEFAULT_LIMIT: i64 = 20;
pub const LIST_LIMIT_MAX: i64 = 100;
pub const SEARCH_LIMIT_MAX: i64 = 50;

/// 필드 에러를 모으는 도우미
#[derive(Default)]
struct Checks(Vec<FieldError>);

impl Checks {
    fn length(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len == 0 {
            self.fail(field, format!("{field} cannot be empty"));
        } else if len < min {
            self.fail(field, format!("{field} must be at least {min} characters long"));
        } else if len > max {
            self.fail(field, format!("{field} must not exceed {max} characters"));
        }
    }

    fn email(&mut self, field: &str, value: &str) {
        if !is_valid_email(value) {
            self.fail(field, format!("{field} must be a valid email address"));
        }
    }

    fn fail(&mut self, field: &str, message: String) {
        self.0.push(FieldError::new(field, message));
    }

    fn finish(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.0))
        }
    }
}

/// `local@domain.tld` 형태인지 대략적으로 확인합니다.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

pub fn validate_signup(req: &SignupRequest) -> Result<(), AppError> {
    let mut checks = Checks::default();
    checks.length("name", &req.name, NAME_MIN, NAME_MAX);
    checks.email("email", &req.email);
    checks.length("password", &req.password, PASSWORD_MIN, PASSWORD_MAX);
    checks.finish()
}

pub fn validate_login(req: &LoginRequest) -> Result<(), AppError> {
    let mut checks = Checks::default();
    checks.email("email", &req.email);
    if req.password.is_empty() {
        checks.fail("password", "password is required".to_string());
    }
    checks.finish()
}

pub fn validate_profile_update(req: &UpdateProfileRequest) -> Result<(), AppError> {
    if req.name.is_none() && req.email.is_none() {
        return Err(AppError::BadRequest("No valid fields to update".to_string()));
    }
    let mut checks = Checks::default();
    if let Some(name) = &req.name {
        checks.length("name", name, NAME_MIN, NAME_MAX);
    }
    if let Some(email) = &req.email {
        checks.email("email", email);
    }
    checks.finish()
}

pub fn validate_change_password(req: &ChangePasswordRequest) -> Result<(), AppError> {
    let mut checks = Checks::default();
    if req.current_password.is_empty() {
        checks.fail("currentPassword", "currentPassword is required".to_string());
    }
    checks.length("newPassword", &req.new_password, PASSWORD_MIN, PASSWORD_MAX);
    checks.finish()
}

pub fn validate_create_article(req: &CreateArticleRequest) -> Result<(), AppError> {
    let mut checks = Checks::default();
    checks.length("title", &req.title, 1, TITLE_MAX);
    checks.length("content", &req.content, CONTENT_MIN, CONTENT_MAX);
    checks.finish()
}

pub fn validate_update_article(req: &UpdateArticleRequest) -> Result<(), AppError> {
    if req.title.is_none() && req.content.is_none() {
        return Err(AppError::invalid(
            "body",
            "at least one of title or content must be provided",
        ));
    }
    let mut checks = Checks::default();
    if let Some(title) = &req.title {
        checks.length("title", title, 1, TITLE_MAX);
    }
    if let Some(content) = &req.content {
        checks.length("content", content, CONTENT_MIN, CONTENT_MAX);
    }
    checks.finish()
}

/// 페이지 파라미터를 검증하고 기본값(page 1, limit 20)을 채웁니다.
pub fn page_request(
    page: Option<i64>,
    limit: Option<i64>,
    max_limit: i64,
) -> Result<PageRequest, AppError> {
    let page = page.unwrap_or(1);
    let limit = limit.unwrap_or(DEFAULT_LIMIT);

    let mut checks = Checks::default();
    if page < 1 {
        checks.fail("page", "page must be greater than or equal to 1".to_string());
    } else if (page - 1).checked_mul(limit.max(1)).is_none() {
        // OFFSET = (page - 1) * limit 이 i64를 넘는 페이지
        checks.fail("page", "page is too large".to_string());
    }
    if !(1..=max_limit).contains(&limit) {
        checks.fail("limit", format!("limit must be between 1 and {max_limit}"));
    }
    checks.finish()?;

    Ok(PageRequest { page, limit })
}

/// 검색 쿼리를 검증하고 (앞뒤 공백을 제거한 검색어, 페이지)를 돌려줍니다.
pub fn search_request(query: &SearchQuery) -> Result<(String, PageRequest), AppError> {
    let term = query.q.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Err(AppError::invalid("q", "Search query is required"));
    }
    if term.chars().count() > QUERY_MAX {
        return Err(AppError::invalid(
            "q",
            format!("q must not exceed {QUERY_MAX} characters"),
        ));
    }
    let page = page_request(query.page, query.limit, SEARCH_LIMIT_MAX)?;
    Ok((term.to_string(), page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn article_bounds() {
        let ok = CreateArticleRequest {
            title: "T".into(),
            content: "0123456789".into(),
        };
        assert!(validate_create_article(&ok).is_ok());

        let bad = CreateArticleRequest {
            title: "x".repeat(256),
            content: "short".into(),
        };
        let err = validate_create_article(&bad).unwrap_err();
        assert_matches!(err, AppError::Validation(fields) => {
            let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
            assert_eq!(names, vec!["title", "content"]);
        });
    }

    #[test]
    fn update_needs_at_least_one_field() {
        assert!(validate_update_article(&UpdateArticleRequest::default()).is_err());
        let title_only = UpdateArticleRequest {
            title: Some("New".into()),
            content: None,
        };
        assert!(validate_update_article(&title_only).is_ok());
    }

    #[test]
    fn emails() {
        assert!(is_valid_email("john@example.com"));
        assert!(!is_valid_email("john@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jo hn@example.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn pages_default_and_bounds() {
        assert_eq!(
            page_request(None, None, LIST_LIMIT_MAX).unwrap(),
            PageRequest { page: 1, limit: 20 }
        );
        assert!(page_request(Some(0), None, LIST_LIMIT_MAX).is_err());
        assert!(page_request(None, Some(101), LIST_LIMIT_MAX).is_err());
        assert!(page_request(None, Some(51), SEARCH_LIMIT_MAX).is_err());
    }

    #[test]
    fn page_whose_offset_overflows_is_rejected() {
        let err = page_request(Some(i64::MAX), Some(20), LIST_LIMIT_MAX).unwrap_err();
        assert_matches!(err, AppError::Validation(fields) => {
            assert_eq!(fields[0].field, "page");
        });

        let far = page_request(Some(i64::MAX / 20), Some(20), LIST_LIMIT_MAX).unwrap();
        assert_eq!(far.offset(), (i64::MAX / 20 - 1) * 20);
    }

    #[test]
    fn blank_search_is_rejected() {
        let blank = SearchQuery {
            q: Some("   ".into()),
            ..Default::default()
        };
        assert_matches!(search_request(&blank), Err(AppError::Validation(_)));
        assert_matches!(search_request(&SearchQuery::default()), Err(AppError::Validation(_)));

        let padded = SearchQuery {
            q: Some("  AI ".into()),
            ..Default::default()
        };
        assert_eq!(search_request(&padded).unwrap().0, "AI");
    }
}
