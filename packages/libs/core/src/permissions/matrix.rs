//! 권한 매트릭스
//!
//! 리소스 → {create, read, update, delete} 플래그 테이블입니다.
//! 매트릭스에 없는 리소스나 플래그는 항상 거부로 취급합니다.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::resource::{Action, Resource};

/// 리소스 하나에 대한 CRUD 플래그
///
/// 문서에서 생략된 플래그는 `false`입니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrudFlags {
    pub create: bool,
    pub read: bool,
    pub update: bool,
    pub delete: bool,
}

impl CrudFlags {
    /// 모든 플래그 허용
    pub fn all() -> Self {
        Self {
            create: true,
            read: true,
            update: true,
            delete: true,
        }
    }

    /// 읽기 전용
    pub fn read_only() -> Self {
        Self {
            read: true,
            ..Self::default()
        }
    }

    /// 액션 플래그 조회
    pub fn get(&self, action: Action) -> bool {
        match action {
            Action::Create => self.create,
            Action::Read => self.read,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }

    /// 액션 플래그 설정
    pub fn set(&mut self, action: Action, value: bool) {
        match action {
            Action::Create => self.create = value,
            Action::Read => self.read = value,
            Action::Update => self.update = value,
            Action::Delete => self.delete = value,
        }
    }
}

/// 권한 매트릭스 (Role.permissions)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMatrix {
    entries: BTreeMap<Resource, CrudFlags>,
}

impl PermissionMatrix {
    /// 빈 매트릭스 (모두 거부)
    pub fn empty() -> Self {
        Self::default()
    }

    /// 모든 리소스, 모든 액션 허용
    pub fn full_access() -> Self {
        let entries = Resource::ALL
            .into_iter()
            .map(|r| (r, CrudFlags::all()))
            .collect();
        Self { entries }
    }

    /// 리소스 플래그 설정
    pub fn with(mut self, resource: Resource, flags: CrudFlags) -> Self {
        self.entries.insert(resource, flags);
        self
    }

    /// 단일 액션 허용 추가
    pub fn grant(mut self, resource: Resource, action: Action) -> Self {
        self.entries.entry(resource).or_default().set(action, true);
        self
    }

    /// 허용 여부 (deny-by-default)
    pub fn allows(&self, resource: Resource, action: Action) -> bool {
        self.entries
            .get(&resource)
            .map(|flags| flags.get(action))
            .unwrap_or(false)
    }

    /// 리소스 플래그 조회
    pub fn flags(&self, resource: Resource) -> Option<&CrudFlags> {
        self.entries.get(&resource)
    }

    /// 허용된 (리소스, 액션) 목록
    pub fn granted(&self) -> Vec<(Resource, Action)> {
        Resource::ALL
            .into_iter()
            .flat_map(|r| Action::ALL.into_iter().map(move |a| (r, a)))
            .filter(|(r, a)| self.allows(*r, *a))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(|flags| *flags == CrudFlags::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deny_by_default() {
        let matrix = PermissionMatrix::empty().grant(Resource::Expenses, Action::Create);

        assert!(matrix.allows(Resource::Expenses, Action::Create));
        assert!(!matrix.allows(Resource::Expenses, Action::Delete));
        assert!(!matrix.allows(Resource::Invoices, Action::Read));
    }

    #[test]
    fn test_partial_flags_from_json() {
        let json = r#"{"expenses": {"create": true, "read": true}}"#;
        let matrix: PermissionMatrix = serde_json::from_str(json).unwrap();

        let flags = matrix.flags(Resource::Expenses).unwrap();
        assert!(flags.create);
        assert!(flags.read);
        assert!(!flags.update);
        assert!(!flags.delete);
    }

    #[test]
    fn test_unknown_resource_rejected() {
        let json = r#"{"clients": {"read": true}}"#;
        assert!(serde_json::from_str::<PermissionMatrix>(json).is_err());

        let json = r#"{"expenses": {"approve": true}}"#;
        assert!(serde_json::from_str::<PermissionMatrix>(json).is_err());
    }

    #[test]
    fn test_granted_order() {
        let matrix = PermissionMatrix::empty()
            .grant(Resource::Roles, Action::Read)
            .grant(Resource::Employees, Action::Update)
            .grant(Resource::Employees, Action::Create);

        assert_eq!(
            matrix.granted(),
            vec![
                (Resource::Employees, Action::Create),
                (Resource::Employees, Action::Update),
                (Resource::Roles, Action::Read),
            ]
        );
    }

    #[test]
    fn test_full_access() {
        let matrix = PermissionMatrix::full_access();
        assert_eq!(matrix.granted().len(), Resource::ALL.len() * Action::ALL.len());
        assert!(!matrix.is_empty());
        assert!(PermissionMatrix::empty().is_empty());
    }
}
