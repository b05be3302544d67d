//! 테스트 헬퍼

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;

use fdk_core::auth::RouteConfig;

use crate::config::Config;
use crate::state::AppState;

/// 인메모리 SQLite 풀 (단일 커넥션이어야 DB가 유지됨)
pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}

pub const ADMIN_TOKEN: &str = "admin-token";

pub fn test_config() -> Config {
    Config {
        port: 0,
        db_url: "sqlite::memory:".to_string(),
        routes: RouteConfig::default(),
        bootstrap_token: Some(ADMIN_TOKEN.to_string()),
        session_ttl_secs: 3600,
    }
}

pub async fn test_state() -> Arc<AppState> {
    let state = AppState::with_pool(&test_config(), memory_pool().await)
        .await
        .unwrap();
    Arc::new(state)
}

pub fn session_cookie(token: &str) -> String {
    format!("{}={}", fdk_core::auth::SESSION_COOKIE, token)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
