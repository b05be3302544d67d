//! 권한 확인 명령어

use fdk_core::permissions::{Action, Resource};
use reqwest::StatusCode;
use serde::Serialize;

use crate::commands::http;
use crate::context::EffectiveContext;

/// 현재 세션으로 (resource, action) 허용 여부 확인
///
/// 거부되면 에러로 종료합니다.
pub async fn check(ctx: &EffectiveContext, resource: &str, action: &str) -> anyhow::Result<()> {
    let resource = Resource::parse(resource)?;
    let action = Action::parse(action)?;

    #[derive(Serialize)]
    struct Req {
        resource: Resource,
        action: Action,
    }

    let client = http::client();
    let (status, message) = http::send_status(
        http::with_session(ctx, client.post(ctx.url("/api/permissions/check")))?
            .json(&Req { resource, action }),
    )
    .await?;

    match status {
        StatusCode::NO_CONTENT | StatusCode::OK => {
            println!("allowed: {} {}", action, resource);
            Ok(())
        }
        StatusCode::FORBIDDEN => Err(anyhow::anyhow!(
            "denied: {}",
            message.unwrap_or_default()
        )),
        _ => Err(anyhow::anyhow!(
            "check failed ({}): {}",
            status,
            message.unwrap_or_default()
        )),
    }
}
