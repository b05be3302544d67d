//! 보호 대상 리소스와 CRUD 액션

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 보호 대상 리소스
///
/// Role의 권한 매트릭스 키로 사용되는 고정된 열거형입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Employees,
    Users,
    Transactions,
    Expenses,
    Invoices,
    Payments,
    Roles,
}

impl Resource {
    /// 전체 리소스 (정렬 순서)
    pub const ALL: [Resource; 7] = [
        Resource::Employees,
        Resource::Users,
        Resource::Transactions,
        Resource::Expenses,
        Resource::Invoices,
        Resource::Payments,
        Resource::Roles,
    ];

    /// 문자열에서 파싱
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "employees" => Some(Resource::Employees),
            "users" => Some(Resource::Users),
            "transactions" => Some(Resource::Transactions),
            "expenses" => Some(Resource::Expenses),
            "invoices" => Some(Resource::Invoices),
            "payments" => Some(Resource::Payments),
            "roles" => Some(Resource::Roles),
            _ => None,
        }
    }

    /// 문자열에서 파싱 (실패 시 에러)
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| Error::UnknownResource {
            name: s.to_string(),
        })
    }

    /// 문자열로 변환
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Employees => "employees",
            Resource::Users => "users",
            Resource::Transactions => "transactions",
            Resource::Expenses => "expenses",
            Resource::Invoices => "invoices",
            Resource::Payments => "payments",
            Resource::Roles => "roles",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CRUD 액션
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];

    /// 문자열에서 파싱
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "create" => Some(Action::Create),
            "read" => Some(Action::Read),
            "update" => Some(Action::Update),
            "delete" => Some(Action::Delete),
            _ => None,
        }
    }

    /// 문자열에서 파싱 (실패 시 에러)
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| Error::UnknownAction {
            name: s.to_string(),
        })
    }

    /// 문자열로 변환
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_from_str() {
        assert_eq!(Resource::from_str("expenses"), Some(Resource::Expenses));
        assert_eq!(Resource::from_str("Invoices"), Some(Resource::Invoices));
        assert_eq!(Resource::from_str("clients"), None);

        for resource in Resource::ALL {
            assert_eq!(Resource::from_str(resource.as_str()), Some(resource));
        }
    }

    #[test]
    fn test_action_parse_error() {
        assert_eq!(Action::parse("READ").unwrap(), Action::Read);

        let err = Action::parse("approve").unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_ACTION");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Resource::Payments).unwrap();
        assert_eq!(json, "\"payments\"");

        let action: Action = serde_json::from_str("\"delete\"").unwrap();
        assert_eq!(action, Action::Delete);
    }
}
