//! Console 설정

use std::env;

use anyhow::Context as _;
use fdk_core::auth::RouteConfig;

/// Console 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 서버 포트
    pub port: u16,

    /// SQLite URL (roles, sessions)
    pub db_url: String,

    /// 라우트 가드 설정
    pub routes: RouteConfig,

    /// 부트스트랩 세션 토큰 (설정 시 admin Role + 세션 생성)
    pub bootstrap_token: Option<String>,

    /// 부트스트랩 세션 유효 시간 (초)
    pub session_ttl_secs: i64,
}

impl Config {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 키 조회 함수로 설정 로드
    ///
    /// 숫자 값이 잘못되었거나 라우트 설정이 모든 경로를 통과시키면 실패합니다.
    pub fn from_lookup<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RouteConfig::default();

        let routes = RouteConfig {
            public_routes: var("FDK_PUBLIC_ROUTES")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.public_routes),
            api_auth_prefix: var("FDK_API_AUTH_PREFIX").unwrap_or(defaults.api_auth_prefix),
            default_login_redirect: var("FDK_DEFAULT_LOGIN_REDIRECT")
                .unwrap_or(defaults.default_login_redirect),
            login_path: var("FDK_LOGIN_PATH").unwrap_or(defaults.login_path),
        };
        routes.validate().context("invalid route guard configuration")?;

        Ok(Self {
            port: var("FDK_CONSOLE_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("FDK_CONSOLE_PORT must be a port number")?,

            db_url: var("FDK_CONSOLE_DB_URL")
                .unwrap_or_else(|| "sqlite://data/console.db".to_string()),

            routes,

            bootstrap_token: var("FDK_BOOTSTRAP_TOKEN")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),

            session_ttl_secs: var("FDK_SESSION_TTL_SECS")
                .unwrap_or_else(|| "86400".to_string())
                .parse()
                .context("FDK_SESSION_TTL_SECS must be an integer")?,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
