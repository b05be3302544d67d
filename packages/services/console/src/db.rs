//! Console 저장소 (SQLite)
//!
//! Role 문서와 세션을 SQLite에 저장합니다. 테이블 이름은 엔티티 레지스트리에서 가져옵니다.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use fdk_core::permissions::{PermissionMatrix, Resource, Role, RoleStore};
use fdk_core::registry::{EntityDef, EntityRegistry};

/// Role 엔티티 이름
pub const ROLE_ENTITY: &str = "Role";

/// Session 엔티티 이름
pub const SESSION_ENTITY: &str = "Session";

/// Console 엔티티 레지스트리 구성
pub fn build_registry() -> fdk_core::Result<EntityRegistry> {
    let mut registry = EntityRegistry::new();
    registry.register(EntityDef::new(ROLE_ENTITY, "roles").with_resource(Resource::Roles))?;
    registry.register(EntityDef::new(SESSION_ENTITY, "sessions"))?;
    Ok(registry)
}

/// SQLite 풀 생성
///
/// `sqlite://` 파일 경로의 상위 디렉터리는 없으면 만듭니다.
pub async fn connect(db_url: &str) -> anyhow::Result<SqlitePool> {
    let options = if let Some(path) = db_url.strip_prefix("sqlite://") {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
    } else {
        SqliteConnectOptions::from_str(db_url)?.create_if_missing(true)
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// 테이블 생성
pub async fn init(pool: &SqlitePool, registry: &EntityRegistry) -> anyhow::Result<()> {
    let roles = registry.collection(ROLE_ENTITY)?;
    let sessions = registry.collection(SESSION_ENTITY)?;

    let queries = [
        format!(
            r#"CREATE TABLE IF NOT EXISTS {roles} (
                name TEXT PRIMARY KEY,
                permissions_json TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );"#
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {sessions} (
                token TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                role TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                created_at TEXT NOT NULL
            );"#
        ),
    ];

    for q in queries {
        sqlx::query(&q).execute(pool).await?;
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Roles
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite Role 저장소
#[derive(Clone)]
pub struct SqliteRoleStore {
    pool: SqlitePool,
    table: String,
}

impl SqliteRoleStore {
    pub fn new(pool: SqlitePool, registry: &EntityRegistry) -> fdk_core::Result<Self> {
        Ok(Self {
            pool,
            table: registry.collection(ROLE_ENTITY)?.to_string(),
        })
    }

    /// Role 생성 또는 권한 덮어쓰기 (부트스트랩용)
    pub async fn upsert(&self, role: &Role) -> fdk_core::Result<()> {
        role.validate()?;
        let permissions_json = serde_json::to_string(&role.permissions)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(&format!(
            r#"INSERT INTO {} (name, permissions_json, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?3)
               ON CONFLICT(name) DO UPDATE SET permissions_json=excluded.permissions_json, updated_at=excluded.updated_at"#,
            self.table
        ))
        .bind(&role.name)
        .bind(permissions_json)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(fdk_core::Error::store)?;

        Ok(())
    }
}

fn role_from_row(row: &sqlx::sqlite::SqliteRow) -> fdk_core::Result<Role> {
    let name: String = row.try_get("name").map_err(fdk_core::Error::store)?;
    let permissions_json: String = row
        .try_get("permissions_json")
        .map_err(fdk_core::Error::store)?;
    let permissions: PermissionMatrix = serde_json::from_str(&permissions_json)
        .map_err(|e| fdk_core::Error::store(format!("corrupt role document '{}': {}", name, e)))?;
    Ok(Role { name, permissions })
}

#[async_trait]
impl RoleStore for SqliteRoleStore {
    async fn find_by_name(&self, name: &str) -> fdk_core::Result<Option<Role>> {
        let row = sqlx::query(&format!(
            r#"SELECT name, permissions_json FROM {} WHERE name = ?1"#,
            self.table
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(fdk_core::Error::store)?;

        row.as_ref().map(role_from_row).transpose()
    }

    async fn create(&self, role: &Role) -> fdk_core::Result<()> {
        role.validate()?;
        let permissions_json = serde_json::to_string(&role.permissions)?;
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(&format!(
            r#"INSERT INTO {} (name, permissions_json, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?3)"#,
            self.table
        ))
        .bind(&role.name)
        .bind(permissions_json)
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(fdk_core::Error::DuplicateRole {
                    name: role.name.clone(),
                })
            }
            Err(e) => Err(fdk_core::Error::store(e)),
        }
    }

    async fn update(&self, role: &Role) -> fdk_core::Result<()> {
        let permissions_json = serde_json::to_string(&role.permissions)?;

        let result = sqlx::query(&format!(
            r#"UPDATE {} SET permissions_json = ?1, updated_at = ?2 WHERE name = ?3"#,
            self.table
        ))
        .bind(permissions_json)
        .bind(Utc::now().to_rfc3339())
        .bind(&role.name)
        .execute(&self.pool)
        .await
        .map_err(fdk_core::Error::store)?;

        if result.rows_affected() == 0 {
            return Err(fdk_core::Error::RoleNotFound {
                name: role.name.clone(),
            });
        }
        Ok(())
    }

    async fn list(&self) -> fdk_core::Result<Vec<Role>> {
        let rows = sqlx::query(&format!(
            r#"SELECT name, permissions_json FROM {} ORDER BY name"#,
            self.table
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(fdk_core::Error::store)?;

        rows.iter().map(role_from_row).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────────────────────────

/// 세션으로 확인된 사용자
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: String,
    pub role: String,
}

/// 세션 디렉터리
///
/// 세션 토큰 → 사용자/Role 매핑입니다. 라우트 가드는 쿠키 존재만 보므로,
/// 토큰의 실제 유효성(존재 + 미만료)은 여기서 확인합니다.
#[derive(Clone)]
pub struct SessionDirectory {
    pool: SqlitePool,
    table: String,
}

impl SessionDirectory {
    pub fn new(pool: SqlitePool, registry: &EntityRegistry) -> fdk_core::Result<Self> {
        Ok(Self {
            pool,
            table: registry.collection(SESSION_ENTITY)?.to_string(),
        })
    }

    /// 세션 발급 (같은 토큰이면 덮어쓰기)
    pub async fn issue(
        &self,
        token: &str,
        user_id: &str,
        role: &str,
        ttl: Duration,
    ) -> Result<(), sqlx::Error> {
        let now = Utc::now();
        sqlx::query(&format!(
            r#"INSERT INTO {} (token, user_id, role, expires_at, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5)
               ON CONFLICT(token) DO UPDATE SET user_id=excluded.user_id, role=excluded.role, expires_at=excluded.expires_at"#,
            self.table
        ))
        .bind(token)
        .bind(user_id)
        .bind(role)
        .bind((now + ttl).to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// 토큰 해석 (없거나 만료면 None)
    pub async fn resolve(&self, token: &str) -> Result<Option<SessionIdentity>, sqlx::Error> {
        let row = sqlx::query(&format!(
            r#"SELECT user_id, role, expires_at FROM {} WHERE token = ?1"#,
            self.table
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let expires_at: String = row.try_get("expires_at")?;
        let expired = match DateTime::parse_from_rfc3339(&expires_at) {
            Ok(at) => at.with_timezone(&Utc) <= Utc::now(),
            Err(e) => {
                tracing::warn!("Unparseable session expiry {}: {}", expires_at, e);
                true
            }
        };
        if expired {
            return Ok(None);
        }

        Ok(Some(SessionIdentity {
            user_id: row.try_get("user_id")?,
            role: row.try_get("role")?,
        }))
    }

    /// 세션 폐기
    pub async fn revoke(&self, token: &str) -> Result<(), sqlx::Error> {
        sqlx::query(&format!(r#"DELETE FROM {} WHERE token = ?1"#, self.table))
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
