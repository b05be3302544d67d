//! Role 관리 서버 액션
//!
//! 모든 액션은 호출자 Role의 `roles` 리소스 권한을 먼저 확인합니다.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use fdk_core::permissions::{Action, PermissionMatrix, Resource, Role, RoleStore};

use crate::error::Result;
use crate::extract::JsonBody;
use crate::handlers::session::authenticate;
use crate::state::AppState;

/// PUT /api/roles/{name} 요청 본문
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub permissions: PermissionMatrix,
}

/// 요청 본문 파싱 (권한 문서 오류는 400)
fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|e| {
        fdk_core::Error::PermissionParse {
            message: e.to_string(),
        }
        .into()
    })
}

/// GET /api/roles
pub async fn list_roles(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Role>>> {
    let identity = authenticate(&state, &headers).await?;
    state.authorize(&identity, Resource::Roles, Action::Read).await?;

    Ok(Json(state.roles.list().await?))
}

/// GET /api/roles/{name}
pub async fn get_role(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<Json<Role>> {
    let identity = authenticate(&state, &headers).await?;
    state.authorize(&identity, Resource::Roles, Action::Read).await?;

    let role = state
        .roles
        .find_by_name(&name)
        .await?
        .ok_or_else(|| fdk_core::Error::RoleNotFound { name: name.clone() })?;
    Ok(Json(role))
}

/// POST /api/roles
pub async fn create_role(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<Role>)> {
    let identity = authenticate(&state, &headers).await?;
    state.authorize(&identity, Resource::Roles, Action::Create).await?;

    let role: Role = parse_body(body)?;
    role.validate()?;
    state.roles.create(&role).await?;

    tracing::info!(role = %role.name, by = %identity.user_id, "Role created");
    Ok((StatusCode::CREATED, Json(role)))
}

/// PUT /api/roles/{name}
pub async fn update_role(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(name): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Role>> {
    let identity = authenticate(&state, &headers).await?;
    state.authorize(&identity, Resource::Roles, Action::Update).await?;

    let request: UpdateRoleRequest = parse_body(body)?;
    let role = Role::new(name, request.permissions)?;
    state.roles.update(&role).await?;

    tracing::info!(role = %role.name, by = %identity.user_id, "Role updated");
    Ok(Json(role))
}
