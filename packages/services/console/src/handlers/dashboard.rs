//! 대시보드 (로그인 후 기본 랜딩)
//!
//! 현재 사용자의 권한 스냅샷을 컨텍스트로 제공한 상태에서 화면 구성을 만듭니다.
//! 각 섹션의 액션 노출 여부는 컨텍스트 조회로만 결정합니다.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use fdk_core::permissions::{self, provide_permissions, Action, Resource};

use crate::error::Result;
use crate::handlers::permissions::load_snapshot;
use crate::handlers::session::authenticate;
use crate::state::AppState;

/// 대시보드 응답
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub user: String,
    pub role: String,
    pub sections: Vec<Section>,
}

/// 리소스 섹션 (읽기 권한이 있는 리소스만)
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Section {
    pub resource: Resource,
    pub actions: Vec<Action>,
}

/// GET /dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Dashboard>> {
    let identity = authenticate(&state, &headers).await?;
    let snapshot = load_snapshot(&state, &identity.role).await?;

    let sections = provide_permissions(snapshot, async { render_sections() }).await?;

    Ok(Json(Dashboard {
        user: identity.user_id,
        role: identity.role,
        sections,
    }))
}

/// 컨텍스트 스코프 안에서 섹션 구성
fn render_sections() -> fdk_core::Result<Vec<Section>> {
    let mut sections = Vec::new();
    for resource in Resource::ALL {
        if !permissions::has_permission(resource, Action::Read)? {
            continue;
        }
        let mut actions = Vec::new();
        for action in Action::ALL {
            if permissions::has_permission(resource, action)? {
                actions.push(action);
            }
        }
        sections.push(Section { resource, actions });
    }
    Ok(sections)
}
