//! Freightdesk Console
//!
//! 백오피스 API 서버입니다. 모든 요청은 라우트 가드를 거치며,
//! Role 관리 서버 액션은 권한 평가기로 호출자 권한을 확인합니다.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod error;
mod extract;
mod handlers;
mod middleware;
mod state;

#[cfg(test)]
mod testing;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "fdk_console=debug,fdk_core=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 설정 로드
    let config = Config::from_env()?;
    tracing::info!("Starting Console with config: {:?}", redacted(&config));

    // 앱 상태 초기화
    let state = AppState::new(&config).await?;
    let state = Arc::new(state);

    // 라우터 구성
    let app = create_router(state);

    // 서버 시작
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Console listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// 로그용 설정 (토큰 제거)
fn redacted(config: &Config) -> Config {
    let mut config = config.clone();
    if config.bootstrap_token.is_some() {
        config.bootstrap_token = Some("***".to_string());
    }
    config
}

/// 라우터 생성
fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Pages
        .route("/dashboard", get(handlers::dashboard::dashboard))
        // Session
        .route("/api/auth/logout", post(handlers::session::logout))
        // Permissions
        .route("/api/permissions/me", get(handlers::permissions::me))
        .route("/api/permissions/check", post(handlers::permissions::check))
        // Roles
        .route(
            "/api/roles",
            get(handlers::roles::list_roles).post(handlers::roles::create_role),
        )
        .route(
            "/api/roles/{name}",
            get(handlers::roles::get_role).put(handlers::roles::update_role),
        )
        // Health check
        .route("/health", get(handlers::health::health_check))
        // Middleware
        .layer(from_fn_with_state(state.clone(), middleware::route_guard))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(from_fn(middleware::request_id))
        // State
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION};
    use axum::http::{Request, StatusCode};
    use serde_json::json;

    use super::*;
    use crate::testing::{body_json, send, session_cookie, test_state, ADMIN_TOKEN};

    fn get_req(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn json_req(method: &str, uri: &str, cookie: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(COOKIE, cookie)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn with_clerk(state: &AppState) -> String {
        state
            .sessions
            .issue("clerk-token", "user_clerk", "clerk", chrono::Duration::hours(1))
            .await
            .unwrap();
        session_cookie("clerk-token")
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Route guard
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_protected_route_without_cookie_redirects_to_root() {
        let app = create_router(test_state().await);

        let resp = send(&app, get_req("/dashboard", None)).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[LOCATION], "/");
        assert!(resp.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_public_route_with_cookie_redirects_to_landing() {
        let app = create_router(test_state().await);

        let secure = format!("{}=anything", fdk_core::auth::SECURE_SESSION_COOKIE);
        for cookie in [session_cookie("anything"), secure] {
            let resp = send(&app, get_req("/health", Some(&cookie))).await;
            assert_eq!(resp.status(), StatusCode::SEE_OTHER);
            assert_eq!(resp.headers()[LOCATION], "/dashboard");
        }
    }

    #[tokio::test]
    async fn test_public_route_without_cookie_passes() {
        let app = create_router(test_state().await);

        let resp = send(&app, get_req("/health", None)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["entities"], json!(["Role", "Session"]));
    }

    #[tokio::test]
    async fn test_api_auth_route_passes_regardless_of_cookie() {
        let app = create_router(test_state().await);

        // 인증 API는 외부 협력자 소유라 라우트가 없으므로 404까지 도달
        for cookie in [None, Some(session_cookie("anything"))] {
            let resp = send(&app, get_req("/api/auth/session", cookie.as_deref())).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn test_guard_does_not_validate_token() {
        let app = create_router(test_state().await);

        // 가드는 통과, 핸들러가 세션을 거부
        let resp = send(&app, get_req("/dashboard", Some(&session_cookie("forged")))).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        assert!(body["error"]["requestId"].is_string());
    }

    #[tokio::test]
    async fn test_logout_revokes_session() {
        let state = test_state().await;
        let clerk_cookie = with_clerk(&state).await;
        let app = create_router(state);

        let resp = send(&app, get_req("/api/permissions/me", Some(&clerk_cookie))).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let logout = Request::builder()
            .method("POST")
            .uri("/api/auth/logout")
            .header(COOKIE, &clerk_cookie)
            .body(Body::empty())
            .unwrap();
        let resp = send(&app, logout).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = send(&app, get_req("/api/permissions/me", Some(&clerk_cookie))).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // 쿠키 없이도 통과
        let anonymous = Request::builder()
            .method("POST")
            .uri("/api/auth/logout")
            .body(Body::empty())
            .unwrap();
        let resp = send(&app, anonymous).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Permissions
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_permissions_me_for_unknown_role_is_empty() {
        let state = test_state().await;
        let cookie = with_clerk(&state).await;
        let app = create_router(state);

        let resp = send(&app, get_req("/api/permissions/me", Some(&cookie))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["role"], "clerk");
        assert_eq!(body["permissions"], json!({}));
    }

    #[tokio::test]
    async fn test_clerk_scenario_over_http() {
        let state = test_state().await;
        let clerk_cookie = with_clerk(&state).await;
        let admin_cookie = session_cookie(ADMIN_TOKEN);
        let app = create_router(state);

        let role = json!({
            "name": "clerk",
            "permissions": {
                "expenses": {"create": true, "read": true, "update": false, "delete": false}
            }
        });
        let resp = send(&app, json_req("POST", "/api/roles", &admin_cookie, role)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let check = |action: &str| {
            json_req(
                "POST",
                "/api/permissions/check",
                &clerk_cookie,
                json!({"resource": "expenses", "action": action}),
            )
        };

        let resp = send(&app, check("read")).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = send(&app, check("update")).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "NOT_AUTHORIZED");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("clerk"));
        assert!(message.contains("update"));
        assert!(message.contains("expenses"));

        let resp = send(&app, check("approve")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_bodies_use_error_envelope() {
        let state = test_state().await;
        let admin_cookie = session_cookie(ADMIN_TOKEN);
        let app = create_router(state);

        let raw = |uri: &str, content_type: Option<&str>, body: &str| {
            let mut builder = Request::builder()
                .method("POST")
                .uri(uri)
                .header(COOKIE, &admin_cookie);
            if let Some(content_type) = content_type {
                builder = builder.header(CONTENT_TYPE, content_type);
            }
            builder.body(Body::from(body.to_string())).unwrap()
        };

        let requests = [
            raw("/api/permissions/check", Some("application/json"), r#"{"resource":1}"#),
            raw("/api/permissions/check", Some("application/json"), "not json"),
            raw("/api/roles", None, r#"{"name":"x","permissions":{}}"#),
        ];

        for request in requests {
            let resp = send(&app, request).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body = body_json(resp).await;
            assert_eq!(body["error"]["code"], "BAD_REQUEST");
            assert!(body["error"]["message"].is_string());
            assert!(body["error"]["requestId"].is_string());
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Roles
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_role_administration() {
        let state = test_state().await;
        let admin_cookie = session_cookie(ADMIN_TOKEN);
        let app = create_router(state);

        let role = json!({"name": "auditor", "permissions": {"invoices": {"read": true}}});
        let resp = send(&app, json_req("POST", "/api/roles", &admin_cookie, role.clone())).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = send(&app, json_req("POST", "/api/roles", &admin_cookie, role)).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let update = json!({"permissions": {"invoices": {"read": true, "update": true}}});
        let resp = send(&app, json_req("PUT", "/api/roles/auditor", &admin_cookie, update)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = send(&app, get_req("/api/roles/auditor", Some(&admin_cookie))).await;
        let body = body_json(resp).await;
        assert_eq!(body["permissions"]["invoices"]["update"], true);

        let resp = send(&app, get_req("/api/roles/ghost", Some(&admin_cookie))).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = send(&app, get_req("/api/roles", Some(&admin_cookie))).await;
        let body = body_json(resp).await;
        let names: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["admin", "auditor"]);
    }

    #[tokio::test]
    async fn test_role_document_with_unknown_resource_rejected() {
        let state = test_state().await;
        let app = create_router(state);

        let role = json!({"name": "broker", "permissions": {"clients": {"read": true}}});
        let resp = send(
            &app,
            json_req("POST", "/api/roles", &session_cookie(ADMIN_TOKEN), role),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "PERMISSION_PARSE_ERROR");
    }

    #[tokio::test]
    async fn test_role_actions_require_permission() {
        let state = test_state().await;
        let clerk_cookie = with_clerk(&state).await;
        let app = create_router(state);

        let resp = send(&app, get_req("/api/roles", Some(&clerk_cookie))).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let role = json!({"name": "intruder", "permissions": {}});
        let resp = send(&app, json_req("POST", "/api/roles", &clerk_cookie, role)).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dashboard
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_dashboard_sections() {
        let state = test_state().await;
        let admin_cookie = session_cookie(ADMIN_TOKEN);
        let app = create_router(state);

        let resp = send(&app, get_req("/dashboard", Some(&admin_cookie))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["role"], "admin");
        assert_eq!(body["user"], "bootstrap");
        assert_eq!(body["sections"].as_array().unwrap().len(), 7);
        assert_eq!(
            body["sections"][0],
            json!({"resource": "employees", "actions": ["create", "read", "update", "delete"]})
        );
    }
}
