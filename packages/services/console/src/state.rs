//! Console 앱 상태

use std::sync::Arc;

use chrono::Duration;
use sqlx::SqlitePool;

use fdk_core::auth::RouteGuard;
use fdk_core::permissions::{Action, PermissionEvaluator, PermissionMatrix, Resource, Role};
use fdk_core::registry::EntityRegistry;

use crate::config::Config;
use crate::db::{self, SessionDirectory, SessionIdentity, SqliteRoleStore};
use crate::error::Result;

/// 부트스트랩 Role 이름
pub const BOOTSTRAP_ROLE: &str = "admin";

/// 부트스트랩 사용자 ID
pub const BOOTSTRAP_USER: &str = "bootstrap";

/// 앱 상태
///
/// 모든 핸들러에서 공유하는 상태입니다.
pub struct AppState {
    /// 설정
    pub config: Config,

    /// 엔티티 레지스트리 (시작 시 고정)
    pub registry: Arc<EntityRegistry>,

    /// 라우트 가드
    pub guard: RouteGuard,

    /// Role Store
    pub roles: SqliteRoleStore,

    /// 세션 디렉터리
    pub sessions: SessionDirectory,
}

impl AppState {
    /// 새 상태 생성
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let pool = db::connect(&config.db_url).await?;
        Self::with_pool(config, pool).await
    }

    /// 기존 풀로 상태 생성
    pub async fn with_pool(config: &Config, pool: SqlitePool) -> anyhow::Result<Self> {
        let registry = db::build_registry()?.freeze();
        db::init(&pool, &registry).await?;

        let state = Self {
            config: config.clone(),
            guard: RouteGuard::new(config.routes.clone()),
            roles: SqliteRoleStore::new(pool.clone(), &registry)?,
            sessions: SessionDirectory::new(pool, &registry)?,
            registry,
        };

        if let Some(token) = &config.bootstrap_token {
            state.bootstrap(token).await?;
        }

        Ok(state)
    }

    /// admin Role과 부트스트랩 세션 생성
    async fn bootstrap(&self, token: &str) -> anyhow::Result<()> {
        let admin = Role::new(BOOTSTRAP_ROLE, PermissionMatrix::full_access())?;
        self.roles.upsert(&admin).await?;
        self.sessions
            .issue(
                token,
                BOOTSTRAP_USER,
                BOOTSTRAP_ROLE,
                Duration::seconds(self.config.session_ttl_secs),
            )
            .await?;
        tracing::info!(
            role = BOOTSTRAP_ROLE,
            ttl_secs = self.config.session_ttl_secs,
            "Bootstrap session issued"
        );
        Ok(())
    }

    /// 권한 평가기
    pub fn evaluator(&self) -> PermissionEvaluator<'_, SqliteRoleStore> {
        PermissionEvaluator::new(&self.roles)
    }

    /// 서버 액션 권한 확인
    ///
    /// 거부 시 `NotAuthorized`를 그대로 전파합니다.
    pub async fn authorize(
        &self,
        identity: &SessionIdentity,
        resource: Resource,
        action: Action,
    ) -> Result<()> {
        if let Err(e) = self
            .evaluator()
            .check_permission(&identity.role, resource, action)
            .await
        {
            tracing::info!(
                user = %identity.user_id,
                role = %identity.role,
                %resource,
                %action,
                "Server action rejected: {}",
                e
            );
            return Err(e.into());
        }
        Ok(())
    }
}
