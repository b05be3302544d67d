//! 인증 명령어

use fdk_core::permissions::PermissionSnapshot;

use crate::commands::{http, OutputFormat};
use crate::config::CliConfig;
use crate::context::EffectiveContext;

/// 세션 토큰 저장
pub async fn login(config: &mut CliConfig, ctx: &EffectiveContext, token: &str) -> anyhow::Result<()> {
    let token = token.trim();
    if token.is_empty() {
        return Err(anyhow::anyhow!("token must not be empty"));
    }

    // 저장 전에 토큰이 유효한지 확인
    let probe = EffectiveContext {
        token: Some(token.to_string()),
        ..ctx.clone()
    };
    let snapshot = fetch_snapshot(&probe).await?;

    config.auth_token = Some(token.to_string());
    config.default_console = Some(ctx.console_url.clone());
    config.save()?;

    println!("Logged in to {} as role '{}'", ctx.console_url, snapshot.role);
    Ok(())
}

/// Console 세션 폐기 후 저장된 토큰 삭제
///
/// Console에 닿지 못해도 로컬 토큰은 삭제합니다.
pub async fn logout(config: &mut CliConfig, ctx: &EffectiveContext) -> anyhow::Result<()> {
    if ctx.token.is_some() {
        let client = http::client();
        let req = http::with_session(ctx, client.post(ctx.url("/api/auth/logout")))?;
        if let Err(e) = http::send(req).await {
            tracing::warn!("Failed to revoke session on console: {:#}", e);
        }
    }

    config.auth_token = None;
    config.save()?;
    println!("Logged out");
    Ok(())
}

/// 현재 Role과 권한 출력
pub async fn whoami(ctx: &EffectiveContext, format: OutputFormat) -> anyhow::Result<()> {
    let snapshot = fetch_snapshot(ctx).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Text => {
            println!("Role: {}", snapshot.role);
            let granted = snapshot.permissions.granted();
            if granted.is_empty() {
                println!("No permissions.");
            }
            for (resource, action) in granted {
                println!("  {} {}", resource, action);
            }
        }
    }
    Ok(())
}

async fn fetch_snapshot(ctx: &EffectiveContext) -> anyhow::Result<PermissionSnapshot> {
    let client = http::client();
    http::send_json(http::with_session(
        ctx,
        client.get(ctx.url("/api/permissions/me")),
    )?)
    .await
}
