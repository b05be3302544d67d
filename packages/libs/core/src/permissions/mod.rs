//! Role 기반 권한 모델
//!
//! # 개요
//!
//! Role은 리소스별 CRUD 플래그 묶음입니다. 서버 측에서는 [`PermissionEvaluator`]가
//! Role Store를 조회해 요청을 허용/거부하고, 클라이언트 측에서는 같은 매트릭스의
//! 스냅샷을 [`scope`] 스코프로 제공해 UI 노출 여부를 결정합니다.
//!
//! 매트릭스에 없는 리소스/액션은 항상 거부입니다.
//!
//! # 모듈 구조
//!
//! - `resource`: 리소스/액션 열거형
//! - `matrix`: 권한 매트릭스
//! - `role`: Role 문서 및 Role Store
//! - `evaluator`: 권한 평가기
//! - `scope`: 클라이언트 권한 컨텍스트 (스코프 단위 스냅샷 제공)

mod evaluator;
mod matrix;
mod resource;
mod role;
pub mod scope;

pub use evaluator::{check_role, PermissionEvaluator};
pub use matrix::{CrudFlags, PermissionMatrix};
pub use resource::{Action, Resource};
pub use role::{validate_role_name, MemoryRoleStore, Role, RoleStore, MAX_ROLE_NAME_LEN};
pub use scope::{has_permission, permissions, provide_permissions, provide_permissions_sync, PermissionSnapshot};
