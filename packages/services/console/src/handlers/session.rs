//! 요청 세션 해석
//!
//! 라우트 가드는 쿠키 존재만 확인합니다. 세션이 필요한 핸들러는 여기서
//! 토큰을 세션 디렉터리에 대조해 사용자와 Role을 확정합니다.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use fdk_core::auth::SessionGate;

use crate::db::SessionIdentity;
use crate::error::{ConsoleError, Result};
use crate::middleware::cookie_headers;
use crate::state::AppState;

/// 세션 토큰으로 사용자 확정
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<SessionIdentity> {
    let cookies = cookie_headers(headers);
    let token = SessionGate::session_token(cookies.iter().copied()).ok_or_else(|| {
        ConsoleError::Unauthorized {
            message: "session required".to_string(),
        }
    })?;

    state
        .sessions
        .resolve(token)
        .await?
        .ok_or_else(|| ConsoleError::Unauthorized {
            message: "invalid or expired session".to_string(),
        })
}

/// POST /api/auth/logout
///
/// 세션을 폐기합니다. 쿠키가 없거나 이미 폐기된 세션이어도 204입니다.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    let cookies = cookie_headers(&headers);
    if let Some(token) = SessionGate::session_token(cookies.iter().copied()) {
        state.sessions.revoke(token).await?;
        tracing::info!("Session revoked");
    }
    Ok(StatusCode::NO_CONTENT)
}
