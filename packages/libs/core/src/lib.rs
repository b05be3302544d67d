//! fdk-core: Freightdesk 공통 핵심 라이브러리
//!
//! 이 크레이트는 Console과 CLI가 공유하는 핵심 타입과 로직을 제공합니다.
//!
//! # 모듈 구조
//!
//! - `permissions`: Role, 권한 매트릭스, 권한 평가기, 클라이언트 권한 컨텍스트
//! - `auth`: 세션 게이트 및 라우트 가드
//! - `registry`: 엔티티 레지스트리
//! - `error`: 공통 에러 타입

pub mod auth;
pub mod error;
pub mod permissions;
pub mod registry;

pub use error::{Error, Result};
