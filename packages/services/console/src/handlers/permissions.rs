//! 권한 스냅샷 / 권한 확인 엔드포인트

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use fdk_core::permissions::{Action, PermissionSnapshot, Resource};

use crate::error::Result;
use crate::extract::JsonBody;
use crate::handlers::session::authenticate;
use crate::state::AppState;

/// GET /api/permissions/me
///
/// 현재 사용자 Role의 권한 스냅샷을 반환합니다. Role이 없으면 빈 매트릭스입니다.
pub async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<PermissionSnapshot>> {
    let identity = authenticate(&state, &headers).await?;
    let snapshot = load_snapshot(&state, &identity.role).await?;
    Ok(Json(snapshot))
}

/// Role 권한 스냅샷 조회
pub async fn load_snapshot(state: &AppState, role: &str) -> Result<PermissionSnapshot> {
    let permissions = state.evaluator().permissions_of(role).await?;
    Ok(PermissionSnapshot::new(role, permissions))
}

/// POST /api/permissions/check 요청 본문
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub resource: String,
    pub action: String,
}

/// POST /api/permissions/check
///
/// 허용이면 204, 거부면 403 `NOT_AUTHORIZED`.
pub async fn check(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    JsonBody(request): JsonBody<CheckRequest>,
) -> Result<StatusCode> {
    let identity = authenticate(&state, &headers).await?;
    let resource = Resource::parse(&request.resource)?;
    let action = Action::parse(&request.action)?;

    state.authorize(&identity, resource, action).await?;
    Ok(StatusCode::NO_CONTENT)
}
