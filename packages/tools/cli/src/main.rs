//! Freightdesk CLI (`fdk`)
//!
//! 웹 콘솔 없이 Role과 권한을 관리하는 운영 도구입니다.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod context;

use commands::OutputFormat;
use config::CliConfig;
use context::EffectiveContext;

#[derive(Parser)]
#[command(name = "fdk")]
#[command(author, version, about = "Freightdesk CLI - Role and permission administration", long_about = None)]
struct Cli {
    /// Console URL (overrides saved config)
    #[arg(long, global = true, env = "FDK_CONSOLE_URL")]
    console: Option<String>,

    /// Session token (overrides saved login)
    #[arg(long, global = true, env = "FDK_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    // ─────────────────────────────────────────────────────────────────────────
    // Auth
    // ─────────────────────────────────────────────────────────────────────────
    /// Save the session token given with --token (or FDK_TOKEN)
    Login,

    /// Revoke the session and forget the saved token
    Logout,

    /// Show current role and permissions
    Whoami,

    // ─────────────────────────────────────────────────────────────────────────
    // Roles & Permissions
    // ─────────────────────────────────────────────────────────────────────────
    /// Manage roles
    Roles {
        #[command(subcommand)]
        action: RolesAction,
    },

    /// Check whether the current session may perform an action
    Check {
        /// Resource (e.g. expenses)
        resource: String,
        /// Action (create, read, update, delete)
        action: String,
    },
}

#[derive(Subcommand)]
enum RolesAction {
    /// List roles
    List,
    /// Show a role
    Get { name: String },
    /// Create or update a role from a YAML file
    Apply {
        #[arg(long, short)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // 설정 로드
    let mut config = CliConfig::load()?;

    // 호출 대상 결정 (CLI 옵션/환경변수 > 저장된 설정)
    let ctx = EffectiveContext::resolve(cli.console.clone(), cli.token.clone(), &config);
    tracing::debug!(console = %ctx.console_url, "resolved context");

    // 명령 실행
    match cli.command {
        Commands::Login => {
            let token = cli
                .token
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("Missing session token. Use 'fdk login --token <token>'"))?;
            commands::auth::login(&mut config, &ctx, token).await
        }
        Commands::Logout => commands::auth::logout(&mut config, &ctx).await,
        Commands::Whoami => commands::auth::whoami(&ctx, cli.format).await,
        Commands::Roles { action } => match action {
            RolesAction::List => commands::roles::list(&ctx, cli.format).await,
            RolesAction::Get { name } => commands::roles::get(&ctx, &name, cli.format).await,
            RolesAction::Apply { file } => commands::roles::apply(&ctx, &file).await,
        },
        Commands::Check { resource, action } => {
            commands::check::check(&ctx, &resource, &action).await
        }
    }
}
