//! CLI 명령어 구현

pub mod auth;
pub mod check;
pub mod http;
pub mod roles;

/// 출력 형식
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
