//! 세션 게이트 및 라우트 가드
//!
//! # 개요
//!
//! 모든 요청은 핸들러 실행 전에 라우트 가드를 통과합니다.
//!
//! - **Session Gate**: 세션 쿠키 존재 여부로 로그인 상태 판정
//! - **Route Guard**: 경로 분류(public / api-auth / protected)와 로그인 상태로
//!   리다이렉트 또는 통과 결정
//!
//! 가드는 토큰의 서명/만료를 검증하지 않습니다. 토큰 유효성은 세션을 발급한 쪽과
//! 세션을 실제로 해석하는 핸들러가 확인합니다. 가드는 I/O 없이 문자열 비교만 수행합니다.

mod routes;
mod session;

pub use routes::{GuardDecision, RouteClass, RouteConfig, RouteGuard};
pub use session::{cookie_value, SessionGate, SECURE_SESSION_COOKIE, SESSION_COOKIE};
