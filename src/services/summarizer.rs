//! # 요약(Summarization) 클라이언트
//!
//! 문서 본문의 짧은 요약을 만듭니다.
//! 외부 모델(Hugging Face Inference API)을 우선 사용하고,
//! 실패하면 문장 단위로 앞부분을 잘라내는 로컬 폴백으로 대체합니다.
//!
//! ## 구성
//! - `SummaryModel`: 외부 모델 호출을 추상화한 트레이트 (테스트에서 교체 가능)
//! - `HuggingFaceModel`: reqwest 기반 실제 구현 (30초 타임아웃)
//! - `Summarizer`: 입력 검증 + 모델 호출 + 폴백을 묶은 진입점
//! - `fallback_summary()`: 네트워크 없이 결정적으로 동작하는 순수 함수

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::config::SummaryConfig;

/// 요약을 요청할 수 있는 최소 글자 수 (앞뒤 공백 제외)
pub const MIN_INPUT_CHARS: usize = 50;
/// 외부 모델 호출 타임아웃
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// 폴백 요약의 최대 길이
pub const FALLBACK_MAX_CHARS: usize = 200;
/// 폴백 요약에 담을 최대 문장 수
pub const FALLBACK_MAX_SENTENCES: usize = 3;

/// 요약 실패 원인
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummarizeError {
    /// 입력이 너무 짧음. 네트워크 요청 전에 판별됩니다.
    #[error("Text must be at least {MIN_INPUT_CHARS} characters long for summarization")]
    InvalidInput,

    /// API 키가 없거나 거부됨
    #[error("Invalid or missing API key for summarization service")]
    Unauthenticated,

    #[error("Summarization service rate limit exceeded")]
    RateLimited,

    /// 서비스가 일시적으로 응답하지 않음 (503, 연결 실패 등)
    #[error("Summarization service unavailable: {0}")]
    Unavailable(String),

    #[error("Summarization request timed out")]
    Timeout,

    /// 응답 형식이 예상과 다름
    #[error("Malformed summarization response: {0}")]
    Malformed(String),
}

/// 외부 요약 모델 호출
///
/// `Arc<dyn SummaryModel>`로 공유되므로 `Send + Sync`가 필요합니다.
#[async_trait]
pub trait SummaryModel: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError>;
}

/// Hugging Face Inference API 응답의 한 항목: `[{ "summary_text": "..." }]`
#[derive(Debug, Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

/// Hugging Face Inference API를 호출하는 요약 모델
pub struct HuggingFaceModel {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HuggingFaceModel {
    pub fn new(config: &SummaryConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(client, config))
    }

    /// 이미 만들어진 [`reqwest::Client`]를 재사용합니다.
    pub fn with_client(client: reqwest::Client, config: &SummaryConfig) -> Self {
        Self {
            client,
            endpoint: format!(
                "{}/{}",
                config.api_url.trim_end_matches('/'),
                config.model
            ),
            api_key: config.api_key.clone(),
        }
    }

    fn map_status(status: StatusCode) -> SummarizeError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SummarizeError::Unauthenticated,
            StatusCode::TOO_MANY_REQUESTS => SummarizeError::RateLimited,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => SummarizeError::Timeout,
            other => SummarizeError::Unavailable(format!("status {}", other.as_u16())),
        }
    }

    fn map_transport(err: reqwest::Error) -> SummarizeError {
        if err.is_timeout() {
            SummarizeError::Timeout
        } else if err.is_decode() {
            SummarizeError::Malformed(err.to_string())
        } else {
            SummarizeError::Unavailable(err.to_string())
        }
    }
}

#[async_trait]
impl SummaryModel for HuggingFaceModel {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        // 키가 없으면 요청을 보내지 않습니다.
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SummarizeError::Unauthenticated)?;

        // 길이 범위를 고정하고 샘플링 없이(do_sample=false) 결정적으로 디코딩합니다.
        let body = json!({
            "inputs": text,
            "parameters": {
                "max_length": 150,
                "min_length": 30,
                "do_sample": false,
                "num_beams": 4,
                "early_stopping": true
            }
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::map_status(status));
        }

        let outputs: Vec<SummaryOutput> = response
            .json()
            .await
            .map_err(|e| SummarizeError::Malformed(e.to_string()))?;

        let summary = outputs
            .into_iter()
            .next()
            .map(|o| o.summary_text.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SummarizeError::Malformed("missing summary_text".to_string()))?;

        Ok(summary)
    }
}

/// 요약 진입점. 클론해도 같은 모델을 공유합니다.
#[derive(Clone)]
pub struct Summarizer {
    model: Arc<dyn SummaryModel>,
}

impl Summarizer {
    pub fn new(model: Arc<dyn SummaryModel>) -> Self {
        Self { model }
    }

    /// 외부 모델로 요약합니다. 실패 원인을 그대로 돌려줍니다.
    pub async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        if text.trim().chars().count() < MIN_INPUT_CHARS {
            return Err(SummarizeError::InvalidInput);
        }
        self.model.summarize(text).await
    }

    /// 외부 모델로 요약하되, 어떤 이유로든 실패하면 로컬 폴백을 사용합니다.
    ///
    /// 입력이 너무 짧은 경우(`InvalidInput`)만 에러로 돌려줍니다.
    pub async fn summarize_with_fallback(&self, text: &str) -> Result<String, SummarizeError> {
        match self.summarize(text).await {
            Ok(summary) => {
                tracing::debug!("summary generated by upstream model");
                Ok(summary)
            }
            Err(SummarizeError::InvalidInput) => Err(SummarizeError::InvalidInput),
            Err(e) => {
                tracing::warn!(error = %e, "upstream summarization failed, using fallback");
                Ok(fallback_summary(text))
            }
        }
    }
}

/// 네트워크 없이 앞부분 문장들로 요약을 만듭니다.
///
/// 1. 연속 공백을 한 칸으로 정규화
/// 2. `.`, `!`, `?`로 문장을 나눔
/// 3. 최대 3문장, 누적 200자를 넘기 전까지 앞 문장을 이어 붙임
///
/// 문장 경계가 없거나 첫 문장만으로 200자를 넘으면
/// 정규화된 텍스트를 200자로 자르고 잘린 경우 `...`을 붙입니다.
pub fn fallback_summary(text: &str) -> String {
    let clean = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let has_boundary = clean.contains(['.', '!', '?']);
    let sentences: Vec<&str> = clean
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if has_boundary {
        let mut summary = String::new();
        let mut summary_chars = 0;
        let mut count = 0;

        for sentence in sentences {
            let sentence_chars = sentence.chars().count();
            if count >= FALLBACK_MAX_SENTENCES || summary_chars + sentence_chars > FALLBACK_MAX_CHARS
            {
                break;
            }
            summary.push_str(sentence);
            summary.push_str(". ");
            summary_chars += sentence_chars + 2;
            count += 1;
        }

        let summary = summary.trim_end().to_string();
        if !summary.is_empty() {
            return summary;
        }
    }

    truncate_chars(&clean, FALLBACK_MAX_CHARS)
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
