//! Role 정의 및 Role Store
//!
//! Role은 이름과 권한 매트릭스의 묶음입니다. 관리자가 한 번 생성하고,
//! 권한 평가기가 매 요청마다 이름으로 조회합니다. 자동 삭제 경로는 없습니다.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::matrix::PermissionMatrix;
use crate::error::{Error, Result};

/// Role 이름 최대 길이
pub const MAX_ROLE_NAME_LEN: usize = 64;

/// Role 문서
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// 고유 이름
    pub name: String,

    /// 리소스별 권한
    #[serde(default)]
    pub permissions: PermissionMatrix,
}

impl Role {
    /// 새 Role 생성 (이름 검증 포함)
    pub fn new(name: impl Into<String>, permissions: PermissionMatrix) -> Result<Self> {
        let role = Self {
            name: name.into(),
            permissions,
        };
        role.validate()?;
        Ok(role)
    }

    /// YAML 문서에서 파싱
    ///
    /// ```yaml
    /// name: clerk
    /// permissions:
    ///   expenses: { create: true, read: true }
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let role: Role = serde_yaml::from_str(yaml).map_err(|e| Error::PermissionParse {
            message: e.to_string(),
        })?;
        role.validate()?;
        Ok(role)
    }

    /// 이름 검증
    pub fn validate(&self) -> Result<()> {
        validate_role_name(&self.name)
    }
}

/// Role 이름 검증
pub fn validate_role_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidRoleName {
            reason: "role name must not be empty".to_string(),
        });
    }
    if name.chars().any(char::is_whitespace) {
        return Err(Error::InvalidRoleName {
            reason: format!("role name '{}' must not contain whitespace", name),
        });
    }
    if name.chars().count() > MAX_ROLE_NAME_LEN {
        return Err(Error::InvalidRoleName {
            reason: format!("role name exceeds {} characters", MAX_ROLE_NAME_LEN),
        });
    }
    Ok(())
}

/// Role 저장소
///
/// 영속화된 Role 문서에 대한 접근 경로입니다. 평가기는 `find_by_name`만 사용합니다.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// 이름으로 Role 조회
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>>;

    /// Role 생성 (이름 중복 시 `DuplicateRole`)
    async fn create(&self, role: &Role) -> Result<()>;

    /// Role 권한 갱신 (없으면 `RoleNotFound`)
    async fn update(&self, role: &Role) -> Result<()>;

    /// 전체 Role 목록 (이름순)
    async fn list(&self) -> Result<Vec<Role>>;
}

/// 메모리 Role 저장소
#[derive(Debug, Default)]
pub struct MemoryRoleStore {
    roles: RwLock<BTreeMap<String, Role>>,
}

impl MemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 초기 Role 목록으로 생성
    pub fn with_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        let roles = roles.into_iter().map(|r| (r.name.clone(), r)).collect();
        Self {
            roles: RwLock::new(roles),
        }
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::store("role store lock poisoned")
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>> {
        let roles = self.roles.read().map_err(poisoned)?;
        Ok(roles.get(name).cloned())
    }

    async fn create(&self, role: &Role) -> Result<()> {
        role.validate()?;
        let mut roles = self.roles.write().map_err(poisoned)?;
        if roles.contains_key(&role.name) {
            return Err(Error::DuplicateRole {
                name: role.name.clone(),
            });
        }
        roles.insert(role.name.clone(), role.clone());
        Ok(())
    }

    async fn update(&self, role: &Role) -> Result<()> {
        let mut roles = self.roles.write().map_err(poisoned)?;
        match roles.get_mut(&role.name) {
            Some(existing) => {
                existing.permissions = role.permissions.clone();
                Ok(())
            }
            None => Err(Error::RoleNotFound {
                name: role.name.clone(),
            }),
        }
    }

    async fn list(&self) -> Result<Vec<Role>> {
        let roles = self.roles.read().map_err(poisoned)?;
        Ok(roles.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{Action, Resource};

    #[test]
    fn test_role_from_yaml() {
        let yaml = r#"
name: clerk
permissions:
  expenses:
    create: true
    read: true
  invoices: { read: true }
"#;
        let role = Role::from_yaml(yaml).unwrap();

        assert_eq!(role.name, "clerk");
        assert!(role.permissions.allows(Resource::Expenses, Action::Create));
        assert!(!role.permissions.allows(Resource::Expenses, Action::Update));
        assert!(role.permissions.allows(Resource::Invoices, Action::Read));
    }

    #[test]
    fn test_role_from_yaml_unknown_resource() {
        let yaml = r#"
name: clerk
permissions:
  clients: { read: true }
"#;
        let err = Role::from_yaml(yaml).unwrap_err();
        assert_eq!(err.code(), "PERMISSION_PARSE_ERROR");
    }

    #[test]
    fn test_role_name_validation() {
        assert!(Role::new("clerk", PermissionMatrix::empty()).is_ok());
        assert!(Role::new("", PermissionMatrix::empty()).is_err());
        assert!(Role::new("   ", PermissionMatrix::empty()).is_err());
        assert!(Role::new("head clerk", PermissionMatrix::empty()).is_err());
        assert!(Role::new("x".repeat(65), PermissionMatrix::empty()).is_err());
    }

    #[tokio::test]
    async fn test_memory_store_lifecycle() {
        let store = MemoryRoleStore::new();
        let clerk = Role::new(
            "clerk",
            PermissionMatrix::empty().grant(Resource::Expenses, Action::Read),
        )
        .unwrap();

        store.create(&clerk).await.unwrap();
        let err = store.create(&clerk).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateRole { .. }));

        let updated = Role::new(
            "clerk",
            PermissionMatrix::empty().grant(Resource::Expenses, Action::Update),
        )
        .unwrap();
        store.update(&updated).await.unwrap();

        let found = store.find_by_name("clerk").await.unwrap().unwrap();
        assert!(found.permissions.allows(Resource::Expenses, Action::Update));
        assert!(!found.permissions.allows(Resource::Expenses, Action::Read));

        let missing = Role::new("auditor", PermissionMatrix::empty()).unwrap();
        let err = store.update(&missing).await.unwrap_err();
        assert!(matches!(err, Error::RoleNotFound { .. }));

        assert_eq!(store.list().await.unwrap().len(), 1);
        assert!(store.find_by_name("auditor").await.unwrap().is_none());
    }
}
