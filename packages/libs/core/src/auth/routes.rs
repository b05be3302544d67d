//! 라우트 분류 및 가드 결정

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 라우트 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    /// 인증 없이 접근 가능한 경로 (정확히 일치)
    pub public_routes: Vec<String>,

    /// 인증 API 경로 prefix (항상 통과)
    pub api_auth_prefix: String,

    /// 로그인 사용자가 public 경로 접근 시 이동할 경로
    pub default_login_redirect: String,

    /// 미인증 사용자가 보호 경로 접근 시 이동할 경로
    pub login_path: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            public_routes: vec!["/".to_string(), "/login".to_string(), "/health".to_string()],
            api_auth_prefix: "/api/auth".to_string(),
            default_login_redirect: "/dashboard".to_string(),
            login_path: "/".to_string(),
        }
    }
}

/// 라우트 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    PublicRoute,
    ApiAuthRoute,
    ProtectedRoute,
}

impl RouteConfig {
    /// 설정 검증
    ///
    /// api-auth prefix는 `/`로 시작하는 비어있지 않은 경로여야 합니다. 빈 prefix나 `/`는
    /// 모든 경로를 통과시키므로 거부합니다.
    pub fn validate(&self) -> Result<()> {
        let prefix = self.api_auth_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return Err(Error::InvalidRouteConfig {
                reason: format!(
                    "api auth prefix '{}' would match every path",
                    self.api_auth_prefix
                ),
            });
        }
        if !prefix.starts_with('/') {
            return Err(Error::InvalidRouteConfig {
                reason: format!("api auth prefix '{}' must start with '/'", self.api_auth_prefix),
            });
        }
        for path in [&self.login_path, &self.default_login_redirect] {
            if !path.starts_with('/') {
                return Err(Error::InvalidRouteConfig {
                    reason: format!("redirect path '{}' must start with '/'", path),
                });
            }
        }
        Ok(())
    }

    /// 경로가 api-auth prefix 아래에 있는지 (세그먼트 경계 기준)
    ///
    /// `/api/auth`는 `/api/auth`, `/api/auth/...`와 일치하고 `/api/authorize`와는
    /// 일치하지 않습니다. 빈 prefix는 어떤 경로와도 일치하지 않습니다.
    fn is_api_auth(&self, path: &str) -> bool {
        let prefix = self.api_auth_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return false;
        }
        match path.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// 경로 분류
    ///
    /// api-auth prefix가 public 목록보다 우선합니다.
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.is_api_auth(path) {
            RouteClass::ApiAuthRoute
        } else if self.public_routes.iter().any(|route| route == path) {
            RouteClass::PublicRoute
        } else {
            RouteClass::ProtectedRoute
        }
    }
}

/// 가드 결정
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// 그대로 통과
    PassThrough,

    /// 지정 경로로 리다이렉트
    Redirect(String),
}

/// 라우트 가드
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    config: RouteConfig,
}

impl RouteGuard {
    pub fn new(config: RouteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    /// 요청 하나에 대한 결정
    ///
    /// | 분류 | 로그인 | 결과 |
    /// |---|---|---|
    /// | ApiAuthRoute | - | 통과 |
    /// | PublicRoute | O | `default_login_redirect` |
    /// | PublicRoute | X | 통과 |
    /// | ProtectedRoute | O | 통과 |
    /// | ProtectedRoute | X | `login_path` |
    pub fn decide(&self, path: &str, logged_in: bool) -> GuardDecision {
        match (self.config.classify(path), logged_in) {
            (RouteClass::ApiAuthRoute, _) => GuardDecision::PassThrough,
            (RouteClass::PublicRoute, true) => {
                GuardDecision::Redirect(self.config.default_login_redirect.clone())
            }
            (RouteClass::PublicRoute, false) => GuardDecision::PassThrough,
            (RouteClass::ProtectedRoute, true) => GuardDecision::PassThrough,
            (RouteClass::ProtectedRoute, false) => {
                GuardDecision::Redirect(self.config.login_path.clone())
            }
        }
    }
}
