//! 호출 대상 결정
//!
//! 전역 플래그(`--console`, `--token`, clap이 `FDK_CONSOLE_URL`/`FDK_TOKEN`도 읽음)가
//! 저장된 설정보다 우선합니다.

use anyhow::Context as _;
use reqwest::Url;

use crate::config::CliConfig;

/// 기본 Console URL
pub const DEFAULT_CONSOLE_URL: &str = "http://localhost:3000";

/// Effective Context (최종 결정된 호출 대상)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveContext {
    pub console_url: String,
    pub token: Option<String>,
}

impl EffectiveContext {
    /// 플래그와 설정 병합
    pub fn resolve(console: Option<String>, token: Option<String>, config: &CliConfig) -> Self {
        let console_url = console
            .or_else(|| config.default_console.clone())
            .unwrap_or_else(|| DEFAULT_CONSOLE_URL.to_string());

        Self {
            console_url: console_url.trim_end_matches('/').to_string(),
            token: token.or_else(|| config.auth_token.clone()),
        }
    }

    /// 세션 토큰 필수 검증
    pub fn require_token(&self) -> anyhow::Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Not logged in. Use 'fdk login --token <token>' or set FDK_TOKEN"))
    }

    /// API URL 생성
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.console_url, path)
    }

    /// 경로 세그먼트로 API URL 생성 (각 세그먼트는 퍼센트 인코딩)
    pub fn segment_url(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.console_url)
            .with_context(|| format!("invalid console URL: {}", self.console_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("console URL cannot be a base: {}", self.console_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
