//! Role 관리 명령어

use std::path::Path;

use anyhow::Context as _;
use fdk_core::permissions::Role;
use reqwest::StatusCode;
use serde::Serialize;

use crate::commands::{http, OutputFormat};
use crate::context::EffectiveContext;

pub async fn list(ctx: &EffectiveContext, format: OutputFormat) -> anyhow::Result<()> {
    let client = http::client();
    let roles: Vec<Role> =
        http::send_json(http::with_session(ctx, client.get(ctx.url("/api/roles")))?).await?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&roles)?);
        return Ok(());
    }

    if roles.is_empty() {
        println!("No roles.");
        return Ok(());
    }

    for role in roles {
        print_role(&role);
    }
    Ok(())
}

pub async fn get(ctx: &EffectiveContext, name: &str, format: OutputFormat) -> anyhow::Result<()> {
    let client = http::client();
    let role: Role = http::send_json(http::with_session(
        ctx,
        client.get(ctx.segment_url(&["api", "roles", name])?),
    )?)
    .await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&role)?),
        OutputFormat::Text => print_role(&role),
    }
    Ok(())
}

/// YAML 파일의 Role 적용 (없으면 생성, 있으면 권한 갱신)
pub async fn apply(ctx: &EffectiveContext, file: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let role = Role::from_yaml(&content)?;
    let client = http::client();

    let (status, message) = http::send_status(
        http::with_session(ctx, client.post(ctx.url("/api/roles")))?.json(&role),
    )
    .await?;

    match status {
        StatusCode::CREATED => {
            println!("Created role '{}'", role.name);
            Ok(())
        }
        StatusCode::CONFLICT => {
            #[derive(Serialize)]
            struct Req<'a> {
                permissions: &'a fdk_core::permissions::PermissionMatrix,
            }

            let _: Role = http::send_json(
                http::with_session(
                    ctx,
                    client.put(ctx.segment_url(&["api", "roles", role.name.as_str()])?),
                )?
                .json(&Req {
                    permissions: &role.permissions,
                }),
            )
            .await?;
            println!("Updated role '{}'", role.name);
            Ok(())
        }
        _ => Err(anyhow::anyhow!(
            "apply failed ({}): {}",
            status,
            message.unwrap_or_default()
        )),
    }
}

fn print_role(role: &Role) {
    println!("- {}", role.name);
    for (resource, action) in role.permissions.granted() {
        println!("    {} {}", resource, action);
    }
}
