//! 권한 평가기
//!
//! (role, resource, action) 요청을 Role Store 조회 결과로 허용/거부합니다.

use super::matrix::PermissionMatrix;
use super::resource::{Action, Resource};
use super::role::{Role, RoleStore};
use crate::error::{Error, Result};

/// 권한 평가기
///
/// 캐시 없이 호출마다 Role Store를 한 번 조회합니다. 거부는 `Error::NotAuthorized`로
/// 반환되며 호출자는 `?`로 전파합니다.
pub struct PermissionEvaluator<'a, S: RoleStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RoleStore + ?Sized> PermissionEvaluator<'a, S> {
    /// 새 평가기 생성
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// 권한 확인
    ///
    /// # Arguments
    /// * `role_name` - Role 이름 (빈 이름은 조회 없이 거부)
    /// * `resource` - 대상 리소스
    /// * `action` - CRUD 액션
    ///
    /// # Errors
    /// * `NotAuthorized` - Role이 없거나 해당 플래그가 false/누락
    /// * 저장소 에러는 그대로 전파
    pub async fn check_permission(
        &self,
        role_name: &str,
        resource: Resource,
        action: Action,
    ) -> Result<()> {
        if role_name.trim().is_empty() {
            tracing::debug!(%resource, %action, "permission denied: empty role name");
            return Err(Error::not_authorized(role_name, action, resource));
        }

        let role = self.store.find_by_name(role_name).await?;
        match role {
            Some(role) => check_role(&role, resource, action),
            None => {
                tracing::debug!(role = role_name, %resource, %action, "permission denied: unknown role");
                Err(Error::not_authorized(role_name, action, resource))
            }
        }
    }

    /// Role의 권한 매트릭스 조회 (없는 Role은 빈 매트릭스)
    pub async fn permissions_of(&self, role_name: &str) -> Result<PermissionMatrix> {
        if role_name.trim().is_empty() {
            return Ok(PermissionMatrix::empty());
        }
        Ok(self
            .store
            .find_by_name(role_name)
            .await?
            .map(|role| role.permissions)
            .unwrap_or_default())
    }
}

/// 이미 로드된 Role에 대한 권한 확인 (저장소 접근 없음)
pub fn check_role(role: &Role, resource: Resource, action: Action) -> Result<()> {
    if role.permissions.allows(resource, action) {
        Ok(())
    } else {
        tracing::debug!(role = %role.name, %resource, %action, "permission denied");
        Err(Error::not_authorized(&role.name, action, resource))
    }
}
