use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::state::AppState;

/// 헬스 체크
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let entities: Vec<&str> = state.registry.names().collect();
    Json(serde_json::json!({"ok": true, "entities": entities}))
}
