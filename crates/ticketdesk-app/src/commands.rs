//! CLI 명령 처리.
//!
//! 각 명령은 조립된 `Services`를 통해서만 서버와 통신한다.

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use ticketdesk_core::models::filter::FilterState;
use ticketdesk_core::models::ticket::{Category, Priority, Status, TicketId};
use ticketdesk_sync::advisor::AdvisoryOutcome;
use ticketdesk_sync::presenter::{present_stats, present_tickets};
use ticketdesk_sync::sequence::FetchOutcome;
use ticketdesk_sync::stats::StatsAggregator;
use ticketdesk_sync::ticket_list::TicketListSynchronizer;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::lifecycle::LifecycleManager;
use crate::wiring::Services;

/// `list` 명령 인자
#[derive(Debug, Default)]
pub struct ListArgs {
    pub search: String,
    pub category: String,
    pub priority: String,
    pub status: String,
}

/// `create` 명령 인자
#[derive(Debug)]
pub struct CreateArgs {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub priority: Option<String>,
}

pub async fn list(services: &Services, args: ListArgs) -> Result<()> {
    let filters = FilterState::from_raw(&args.search, &args.category, &args.priority, &args.status)?;

    let outcome = match services.list.set_filters(filters).await {
        Some(outcome) => outcome,
        None => services.list.refetch().await,
    };
    if outcome == FetchOutcome::Failed {
        if let Some(e) = services.list.error() {
            bail!("목록 조회 실패: {e}");
        }
    }

    print_tickets(&services.list);
    Ok(())
}

pub async fn create(services: &Services, args: CreateArgs) -> Result<()> {
    let form = &services.form;
    form.set_title(args.title);
    form.set_description(args.description);

    match form.blur_description().await {
        AdvisoryOutcome::Applied(s) => {
            println!("분류 제안 적용: {} / {}", s.category, s.priority)
        }
        AdvisoryOutcome::TooShort => println!("설명이 짧아 분류 제안을 건너뜁니다"),
        AdvisoryOutcome::Failed => println!("분류 제안을 받지 못했습니다 (기본값 사용)"),
        other => info!("분류 제안 미적용: {other:?}"),
    }

    // 명시한 값이 제안보다 우선
    if let Some(raw) = args.category.as_deref() {
        form.set_category(raw.parse::<Category>()?);
    }
    if let Some(raw) = args.priority.as_deref() {
        form.set_priority(raw.parse::<Priority>()?);
    }

    let ticket = form.submit().await?;
    println!(
        "티켓 생성: #{} [{} / {}] {}",
        ticket.id, ticket.category, ticket.priority, ticket.title
    );
    Ok(())
}

pub async fn status(services: &Services, id: String, status: String) -> Result<()> {
    let status: Status = status.parse()?;
    let id = TicketId::new(id);

    match services.list.update_status(&id, status).await {
        Ok(ticket) => {
            println!("#{} 상태 변경: {}", ticket.id, ticket.status);
            Ok(())
        }
        Err(e) => {
            let reverted = services
                .list
                .status_failure()
                .and_then(|f| f.reverted_to)
                .map(|s| s.to_string())
                .unwrap_or_else(|| "알 수 없음".to_string());
            Err(anyhow!("상태 변경 실패 (현재 상태 {reverted}): {e}"))
        }
    }
}

pub async fn stats(services: &Services) -> Result<()> {
    services.stats.refetch().await;
    if services.stats.snapshot().is_none() {
        bail!("통계를 가져오지 못했습니다");
    }
    print_stats(&services.stats);
    Ok(())
}

pub async fn classify(services: &Services, description: String) -> Result<()> {
    services.form.set_description(description);
    match services.form.blur_description().await {
        AdvisoryOutcome::Applied(s) => {
            println!("카테고리: {}", s.category);
            println!("우선순위: {}", s.priority);
            Ok(())
        }
        AdvisoryOutcome::TooShort => bail!(
            "설명은 공백 제외 {}자 이상이어야 합니다",
            services.form.min_description_chars()
        ),
        other => bail!("분류 제안 실패: {other:?}"),
    }
}

/// 목록/통계 루프를 띄우고 주기적으로 직접 재조회해 출력한다 (Ctrl+C까지)
///
/// 갱신 신호는 변경 작업 성공 시에만 발행되므로 주기 폴링은 신호를 건드리지 않는다.
pub async fn watch(
    services: &Services,
    lifecycle: Arc<LifecycleManager>,
    interval: Duration,
    initial_fetch: bool,
) -> Result<()> {
    let list_task = tokio::spawn(services.list.clone().run(
        services.refresh.subscribe(),
        lifecycle.subscribe(),
        initial_fetch,
    ));
    let stats_task = tokio::spawn(services.stats.clone().run(
        services.refresh.subscribe(),
        lifecycle.subscribe(),
        initial_fetch,
    ));

    let signal_task = tokio::spawn({
        let lifecycle = lifecycle.clone();
        async move { lifecycle.wait_for_signal().await }
    });

    info!(
        "감시 모드 실행 중 ({}초 주기, Ctrl+C로 종료)",
        interval.as_secs()
    );
    report_loop(services, interval, lifecycle.subscribe()).await;

    signal_task.abort();
    list_task.await?;
    stats_task.await?;
    Ok(())
}

async fn report_loop(services: &Services, period: Duration, mut shutdown_rx: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let (list_outcome, stats_outcome) =
                    tokio::join!(services.list.refetch(), services.stats.refetch());
                debug!("주기 재조회: 목록 {list_outcome:?}, 통계 {stats_outcome:?}");
                print_stats(&services.stats);
                print_tickets(&services.list);
            }
            res = shutdown_rx.changed() => {
                if res.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }
}

fn print_tickets(list: &TicketListSynchronizer) {
    let rows = present_tickets(&list.tickets(), Utc::now());
    if rows.is_empty() {
        println!("(티켓 없음)");
        return;
    }
    for row in rows {
        println!(
            "#{:<6} {:<11} {:<4} {:<9} {}  ({})",
            row.id, row.status_label, row.priority_label, row.category_label, row.title, row.time_text
        );
        if !row.excerpt.is_empty() {
            println!("        {}", row.excerpt);
        }
    }
}

fn print_stats(stats: &StatsAggregator) {
    let Some(snapshot) = stats.snapshot() else {
        println!("(통계 없음)");
        return;
    };
    let line: Vec<String> = present_stats(&snapshot)
        .into_iter()
        .map(|card| format!("{}: {}", card.label, card.value))
        .collect();
    println!("{}", line.join(" | "));

    let by_category: Vec<String> = Category::ALL
        .iter()
        .map(|c| format!("{c} {}", snapshot.category_count(*c)))
        .collect();
    println!("카테고리별: {}", by_category.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketdesk_core::config::AppConfig;

    const TICKETS: &str = r#"[{"id": 5, "title": "환불 요청", "description": "Refund for a duplicate charge", "category": "billing", "priority": "medium", "status": "open", "created_at": "2026-10-01T09:00:00Z"}]"#;
    const STATS: &str = r#"{"total_tickets": 1, "open_tickets": 1, "avg_tickets_per_day": 1.0, "priority_breakdown": {"medium": 1}, "category_breakdown": {"billing": 1}}"#;

    #[tokio::test]
    async fn periodic_poll_refetches_without_refresh_signal() {
        let mut server = mockito::Server::new_async().await;
        let list_mock = server
            .mock("GET", "/api/tickets/")
            .with_status(200)
            .with_body(TICKETS)
            .expect_at_least(2)
            .create_async()
            .await;
        let stats_mock = server
            .mock("GET", "/api/tickets/stats/")
            .with_status(200)
            .with_body(STATS)
            .expect_at_least(2)
            .create_async()
            .await;

        let mut config = AppConfig::default_config();
        config.server.base_url = format!("{}/api", server.url());
        let services = Services::from_config(&config).unwrap();
        let sub = services.refresh.subscribe();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let stopper = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(400)).await;
            shutdown_tx.send(true).unwrap();
        });
        report_loop(&services, Duration::from_millis(100), shutdown_rx).await;
        stopper.await.unwrap();

        assert_eq!(services.refresh.current(), 0);
        assert!(!sub.has_changed());
        assert_eq!(services.list.tickets().len(), 1);
        assert_eq!(services.stats.snapshot().unwrap().total_tickets, 1);

        list_mock.assert_async().await;
        stats_mock.assert_async().await;
    }

    #[tokio::test]
    async fn poll_failure_keeps_signal_untouched() {
        let mut config = AppConfig::default_config();
        config.server.base_url = "http://127.0.0.1:9/api".to_string();
        let services = Services::from_config(&config).unwrap();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let stopper = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(350)).await;
            shutdown_tx.send(true).unwrap();
        });
        report_loop(&services, Duration::from_millis(100), shutdown_rx).await;
        stopper.await.unwrap();

        assert_eq!(services.refresh.current(), 0);
        assert!(services.stats.snapshot().is_none());
    }
}
