//! 엔티티 레지스트리
//!
//! 엔티티 이름 → 컬렉션 정의 맵입니다. 프로세스 시작 시 한 번 채우고
//! [`EntityRegistry::freeze`]로 고정한 뒤, 필요한 곳에 명시적으로 전달합니다.
//! 전역 상태는 두지 않습니다.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::permissions::Resource;

/// 엔티티 정의
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDef {
    /// 엔티티 이름 (예: "Role")
    pub name: String,

    /// 저장소 컬렉션/테이블 이름
    pub collection: String,

    /// 권한 검사 대상 리소스
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,
}

impl EntityDef {
    pub fn new(name: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collection: collection.into(),
            resource: None,
        }
    }

    /// 리소스 지정
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    /// 컬렉션 이름 검증
    ///
    /// 컬렉션 이름은 SQL 식별자로 그대로 쓰이므로 `[A-Za-z_][A-Za-z0-9_]*`만 허용합니다.
    fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidEntity {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("entity name must not be empty"));
        }

        let mut chars = self.collection.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return Err(invalid("collection must start with a letter or underscore")),
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid("collection may only contain letters, digits and underscores"));
        }

        Ok(())
    }
}

/// 엔티티 레지스트리
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: BTreeMap<String, EntityDef>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 엔티티 등록
    ///
    /// 같은 정의의 재등록은 기존 항목을 그대로 반환합니다.
    /// 같은 이름에 다른 정의를 등록하면 `DuplicateEntity`입니다.
    pub fn register(&mut self, def: EntityDef) -> Result<&EntityDef> {
        def.validate()?;

        if let Some(existing) = self.entities.get(&def.name) {
            if *existing != def {
                return Err(Error::DuplicateEntity { name: def.name });
            }
            tracing::trace!(entity = %def.name, "entity already registered");
        }

        Ok(self.entities.entry(def.name.clone()).or_insert(def))
    }

    /// 엔티티 조회
    pub fn get(&self, name: &str) -> Option<&EntityDef> {
        self.entities.get(name)
    }

    /// 엔티티 조회 (없으면 에러)
    pub fn require(&self, name: &str) -> Result<&EntityDef> {
        self.get(name).ok_or_else(|| Error::UnknownEntity {
            name: name.to_string(),
        })
    }

    /// 컬렉션 이름 조회
    pub fn collection(&self, name: &str) -> Result<&str> {
        self.require(name).map(|def| def.collection.as_str())
    }

    /// 등록된 엔티티 이름
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// 공유용으로 고정 (이후 변경 불가)
    pub fn freeze(self) -> Arc<EntityRegistry> {
        Arc::new(self)
    }
}
