//! Console 미들웨어
//!
//! 요청 ID 부여와 라우트 가드를 정의합니다.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use fdk_core::auth::{GuardDecision, SessionGate};
use uuid::Uuid;

use crate::state::AppState;

#[derive(Clone, Debug)]
pub struct RequestId(#[allow(dead_code)] pub String);

tokio::task_local! {
    static REQUEST_ID: String;
}

pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestId(id.clone()));
    let mut resp = REQUEST_ID.scope(id.clone(), async move { next.run(req).await }).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        resp.headers_mut().insert("x-request-id", value);
    }
    resp
}

/// 요청의 `Cookie` 헤더 값 목록
pub fn cookie_headers(headers: &HeaderMap) -> Vec<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect()
}

/// 라우트 가드
///
/// 세션 쿠키 존재 여부와 경로 분류로 리다이렉트/통과를 결정합니다.
/// DB 조회 없이 동작합니다.
pub async fn route_guard(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let decision = {
        let cookies = cookie_headers(req.headers());
        let logged_in = SessionGate::is_logged_in(cookies.iter().copied());
        state.guard.decide(req.uri().path(), logged_in)
    };

    match decision {
        GuardDecision::PassThrough => next.run(req).await,
        GuardDecision::Redirect(location) => {
            tracing::debug!(path = %req.uri().path(), %location, "route guard redirect");
            Redirect::to(&location).into_response()
        }
    }
}
