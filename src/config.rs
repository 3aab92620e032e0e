//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: JWT 토큰 서명에 사용할 비밀키 (필수)
//! - `JWT_EXPIRES_HOURS`: 토큰 유효 시간 (기본 168시간 = 7일)
//! - `HOST` / `PORT`: 서버 바인딩 주소
//! - `APP_ENV`: `development` 또는 `production`
//! - `CORS_ORIGIN`: 프론트엔드 출처
//! - `DB_MAX_CONNECTIONS` / `DB_ACQUIRE_TIMEOUT_SECS`: 연결 풀 설정
//! - `SUMMARY_API_URL` / `SUMMARY_MODEL` / `HUGGING_FACE_API_KEY`: 요약 모델 설정

use std::env;
use std::str::FromStr;

/// 실행 환경. 운영(production)에서는 쿠키에 `Secure`를 붙이고
/// 내부 에러 내용을 숨깁니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn is_production(self) -> bool {
        self == AppEnv::Production
    }
}

impl FromStr for AppEnv {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(AppEnv::Production),
            "development" | "dev" | "test" => Ok(AppEnv::Development),
            _ => Err(()),
        }
    }
}

/// 외부 요약 모델 접속 정보
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    /// 모델 엔드포인트의 기본 URL (모델 이름이 뒤에 붙습니다)
    pub api_url: String,
    /// 모델 식별자 (예: "facebook/bart-large-cnn")
    pub model: String,
    /// API 키. 없으면 모든 요약 호출이 네트워크 요청 없이 `Unauthenticated`로 실패합니다.
    pub api_key: Option<String>,
}

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 경로 (예: "sqlite:data/knowbase.db")
    pub database_url: String,
    /// JWT 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 발급 토큰(및 쿠키)의 유효 시간
    pub jwt_expires_hours: i64,
    pub host: String,
    pub port: u16,
    pub app_env: AppEnv,
    /// CORS 허용 출처
    pub cors_origin: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub summary: SummaryConfig,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없거나 해석할 수 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?, // 필수: 없으면 에러
            jwt_secret: env::var("JWT_SECRET")?,     // 필수: 없으면 에러
            jwt_expires_hours: parse_or("JWT_EXPIRES_HOURS", 168),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 5000),
            app_env: parse_or("APP_ENV", AppEnv::Development),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 5),
            db_acquire_timeout_secs: parse_or("DB_ACQUIRE_TIMEOUT_SECS", 2),
            summary: SummaryConfig {
                api_url: env::var("SUMMARY_API_URL")
                    .unwrap_or_else(|_| "https://api-inference.huggingface.co/models".to_string()),
                model: env::var("SUMMARY_MODEL")
                    .unwrap_or_else(|_| "facebook/bart-large-cnn".to_string()),
                // 빈 문자열도 "키 없음"으로 취급합니다.
                api_key: env::var("HUGGING_FACE_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
            },
        })
    }
}

/// 환경변수를 읽어 파싱하고, 없거나 파싱에 실패하면 기본값을 사용합니다.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_env_parses_known_names() {
        assert_eq!("production".parse(), Ok(AppEnv::Production));
        assert_eq!(" Development ".parse(), Ok(AppEnv::Development));
        assert!("staging".parse::<AppEnv>().is_err());
    }
}
