//! 클라이언트 권한 컨텍스트
//!
//! 서버가 내려준 권한 스냅샷을 스코프 단위로 제공합니다. 스코프 안의 코드는
//! [`has_permission`]으로 UI 동작 노출 여부를 결정합니다.
//!
//! 스냅샷은 읽기 전용이며, 갱신하려면 새 스냅샷으로 스코프를 다시 열어야 합니다.
//! 스코프 밖에서의 조회는 프로그래밍 오류로 보고 즉시 `NoProviderInScope`를 반환합니다.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::matrix::PermissionMatrix;
use super::resource::{Action, Resource};
use crate::error::{Error, Result};

tokio::task_local! {
    static PERMISSIONS: Arc<PermissionSnapshot>;
}

/// 권한 스냅샷 (현재 사용자 Role의 권한 사본)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionSnapshot {
    /// Role 이름
    pub role: String,

    /// 조회 시점의 권한 매트릭스
    pub permissions: PermissionMatrix,

    /// 조회 시각
    pub fetched_at: DateTime<Utc>,
}

impl PermissionSnapshot {
    /// 새 스냅샷 생성 (현재 시각)
    pub fn new(role: impl Into<String>, permissions: PermissionMatrix) -> Self {
        Self {
            role: role.into(),
            permissions,
            fetched_at: Utc::now(),
        }
    }

    /// 허용 여부 (deny-by-default)
    pub fn has_permission(&self, resource: Resource, action: Action) -> bool {
        self.permissions.allows(resource, action)
    }
}

/// 스냅샷을 제공하는 스코프 안에서 future 실행
pub async fn provide_permissions<F>(snapshot: PermissionSnapshot, f: F) -> F::Output
where
    F: Future,
{
    PERMISSIONS.scope(Arc::new(snapshot), f).await
}

/// 스냅샷을 제공하는 스코프 안에서 클로저 실행
pub fn provide_permissions_sync<R>(snapshot: PermissionSnapshot, f: impl FnOnce() -> R) -> R {
    PERMISSIONS.sync_scope(Arc::new(snapshot), f)
}

/// 현재 스코프의 스냅샷
pub fn permissions() -> Result<Arc<PermissionSnapshot>> {
    PERMISSIONS
        .try_with(Arc::clone)
        .map_err(|_| Error::NoProviderInScope)
}

/// 현재 스코프에서 허용 여부
pub fn has_permission(resource: Resource, action: Action) -> Result<bool> {
    PERMISSIONS
        .try_with(|snapshot| snapshot.has_permission(resource, action))
        .map_err(|_| Error::NoProviderInScope)
}
