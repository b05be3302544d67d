//! 공통 에러 타입
//!
//! Freightdesk 전체에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Freightdesk 공통 에러
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────────
    // Authorization Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("role '{role}' is not authorized to {action} {resource}")]
    NotAuthorized {
        role: String,
        action: String,
        resource: String,
    },

    #[error("permissions queried outside of a provider scope")]
    NoProviderInScope,

    // ─────────────────────────────────────────────────────────────────────────────
    // Role Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("invalid role name: {reason}")]
    InvalidRoleName { reason: String },

    #[error("role not found: {name}")]
    RoleNotFound { name: String },

    #[error("duplicate role name: {name}")]
    DuplicateRole { name: String },

    #[error("unknown resource: {name}")]
    UnknownResource { name: String },

    #[error("unknown action: {name}")]
    UnknownAction { name: String },

    #[error("permission parse error: {message}")]
    PermissionParse { message: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Registry Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("entity '{name}' is already registered with a different definition")]
    DuplicateEntity { name: String },

    #[error("unknown entity: {name}")]
    UnknownEntity { name: String },

    #[error("invalid entity '{name}': {reason}")]
    InvalidEntity { name: String, reason: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("invalid route config: {reason}")]
    InvalidRouteConfig { reason: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Store Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("store error: {message}")]
    Store { message: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // IO/Serialization Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// 권한 거부 에러 생성
    pub fn not_authorized(role: &str, action: impl ToString, resource: impl ToString) -> Self {
        Error::NotAuthorized {
            role: role.to_string(),
            action: action.to_string(),
            resource: resource.to_string(),
        }
    }

    /// 저장소 에러 생성
    pub fn store(message: impl ToString) -> Self {
        Error::Store {
            message: message.to_string(),
        }
    }

    /// HTTP 상태 코드로 변환
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Error::InvalidRoleName { .. }
            | Error::UnknownResource { .. }
            | Error::UnknownAction { .. }
            | Error::PermissionParse { .. }
            | Error::InvalidEntity { .. }
            | Error::Yaml(_)
            | Error::Json(_) => 400,

            // 403 Forbidden
            Error::NotAuthorized { .. } => 403,

            // 404 Not Found
            Error::RoleNotFound { .. } | Error::UnknownEntity { .. } => 404,

            // 409 Conflict
            Error::DuplicateRole { .. } | Error::DuplicateEntity { .. } => 409,

            // 500 Internal Server Error
            Error::NoProviderInScope | Error::InvalidRouteConfig { .. } | Error::Store { .. } => 500,
        }
    }

    /// 에러 코드 (클라이언트용)
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotAuthorized { .. } => "NOT_AUTHORIZED",
            Error::NoProviderInScope => "NO_PROVIDER_IN_SCOPE",
            Error::InvalidRoleName { .. } => "INVALID_ROLE_NAME",
            Error::RoleNotFound { .. } => "ROLE_NOT_FOUND",
            Error::DuplicateRole { .. } => "DUPLICATE_ROLE",
            Error::UnknownResource { .. } => "UNKNOWN_RESOURCE",
            Error::UnknownAction { .. } => "UNKNOWN_ACTION",
            Error::PermissionParse { .. } => "PERMISSION_PARSE_ERROR",
            Error::DuplicateEntity { .. } => "DUPLICATE_ENTITY",
            Error::UnknownEntity { .. } => "UNKNOWN_ENTITY",
            Error::InvalidEntity { .. } => "INVALID_ENTITY",
            Error::InvalidRouteConfig { .. } => "INVALID_ROUTE_CONFIG",
            Error::Store { .. } => "STORE_ERROR",
            Error::Yaml(_) => "YAML_ERROR",
            Error::Json(_) => "JSON_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_authorized_message() {
        let err = Error::not_authorized("clerk", "update", "expenses");
        let msg = err.to_string();

        assert!(msg.contains("clerk"));
        assert!(msg.contains("update"));
        assert!(msg.contains("expenses"));
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.code(), "NOT_AUTHORIZED");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::NoProviderInScope.status_code(), 500);
        assert_eq!(Error::RoleNotFound { name: "x".into() }.status_code(), 404);
        assert_eq!(Error::DuplicateRole { name: "x".into() }.status_code(), 409);
        assert_eq!(Error::UnknownAction { name: "x".into() }.status_code(), 400);
    }
}
