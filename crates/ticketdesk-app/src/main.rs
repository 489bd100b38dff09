//! # ticketdesk-app
//!
//! Ticketdesk 클라이언트 바이너리 진입점.
//! 설정 로드, DI 와이어링, 명령 실행, 감시 모드 라이프사이클.

mod commands;
mod lifecycle;
mod wiring;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use ticketdesk_core::config::AppConfig;
use ticketdesk_core::config_manager::ConfigManager;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::commands::{CreateArgs, ListArgs};
use crate::lifecycle::LifecycleManager;
use crate::wiring::Services;

/// Ticketdesk 지원 티켓 클라이언트
#[derive(Parser, Debug)]
#[command(name = "ticketdesk")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 서버 URL 지정 (기본: http://localhost:8000/api)
    #[arg(long, short = 's', global = true)]
    server: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "warn", global = true)]
    log_level: String,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 티켓 목록 (필터)
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        priority: String,
        #[arg(long, default_value = "")]
        status: String,
    },
    /// 티켓 생성 (설명으로 분류 제안 후 제출)
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// 지정 시 분류 제안보다 우선
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        priority: Option<String>,
    },
    /// 티켓 상태 변경
    Status { id: String, status: String },
    /// 대시보드 통계
    Stats,
    /// 설명 분류 제안만 받기
    Classify { description: String },
    /// 목록/통계 감시 (Ctrl+C로 종료)
    Watch {
        /// 갱신 주기 (초)
        #[arg(long, default_value = "30")]
        interval: u64,
    },
}

/// 설정 로드 (파일 → CLI 오버라이드)
fn load_config(args: &Args) -> AppConfig {
    let manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    let mut config = match manager {
        Ok(manager) => {
            info!("설정 파일: {}", manager.config_path().display());
            manager.get()
        }
        Err(e) => {
            warn!("설정 로드 실패, 기본 설정 사용: {e}");
            AppConfig::default_config()
        }
    };

    if let Some(ref server_url) = args.server {
        config.server.base_url = server_url.clone();
    }
    config
}

/// 바이너리(`ticketdesk`)와 라이브러리 크레이트별 로그 필터
fn log_filter(level: &str) -> String {
    format!(
        "ticketdesk={level},ticketdesk_core={level},ticketdesk_network={level},ticketdesk_sync={level}"
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = log_filter(&args.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter)),
        )
        .init();

    let config = load_config(&args);
    info!("서버: {}", config.server.base_url);

    let services = Services::from_config(&config)?;

    match args.command {
        Command::List {
            search,
            category,
            priority,
            status,
        } => {
            commands::list(
                &services,
                ListArgs {
                    search,
                    category,
                    priority,
                    status,
                },
            )
            .await
        }
        Command::Create {
            title,
            description,
            category,
            priority,
        } => {
            commands::create(
                &services,
                CreateArgs {
                    title,
                    description,
                    category,
                    priority,
                },
            )
            .await
        }
        Command::Status { id, status } => commands::status(&services, id, status).await,
        Command::Stats => commands::stats(&services).await,
        Command::Classify { description } => commands::classify(&services, description).await,
        Command::Watch { interval } => {
            let lifecycle = Arc::new(LifecycleManager::new());
            commands::watch(
                &services,
                lifecycle,
                Duration::from_secs(interval.max(1)),
                config.sync.run_initial_fetch,
            )
            .await?;
            info!("Ticketdesk 클라이언트 종료");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_targets_binary_and_library_crates() {
        let filter = log_filter("debug");
        let targets: Vec<&str> = filter
            .split(',')
            .filter_map(|d| d.split('=').next())
            .collect();

        assert_eq!(
            targets,
            ["ticketdesk", "ticketdesk_core", "ticketdesk_network", "ticketdesk_sync"]
        );
        assert!(EnvFilter::try_new(&filter).is_ok());
    }
}
