//! 대시보드 통계 집계.
//!
//! 갱신 신호가 바뀔 때마다 통계 전체를 다시 받아 스냅샷을 통째로 교체한다.
//! 실패는 로그만 남기고 마지막 정상 스냅샷을 유지한다.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use ticketdesk_core::models::stats::StatsSnapshot;
use ticketdesk_core::models::ticket::Priority;
use ticketdesk_core::ports::ticket_repository::TicketRepository;

use crate::refresh::RefreshSubscription;
use crate::sequence::{FetchOutcome, RequestSequence};

#[derive(Debug, Default)]
struct StatsState {
    fetches: RequestSequence,
    refresh_seen: u64,
    snapshot: Option<Arc<StatsSnapshot>>,
}

/// 통계 집계기
pub struct StatsAggregator {
    repo: Arc<dyn TicketRepository>,
    state: Mutex<StatsState>,
}

impl StatsAggregator {
    pub fn new(repo: Arc<dyn TicketRepository>) -> Self {
        Self {
            repo,
            state: Mutex::new(StatsState::default()),
        }
    }

    /// 갱신 신호 관측 → 재조회
    pub async fn on_refresh(&self, signal: u64) -> FetchOutcome {
        self.state.lock().refresh_seen = signal;
        self.refetch().await
    }

    /// 통계 재조회
    pub async fn refetch(&self) -> FetchOutcome {
        let token = self.state.lock().fetches.issue();
        debug!("통계 조회 발급 #{token}");

        let result = self.repo.get_stats().await;

        let mut st = self.state.lock();
        if !st.fetches.is_latest(token) {
            debug!("오래된 통계 응답 폐기 #{token}");
            return FetchOutcome::Stale;
        }

        match result {
            Ok(snapshot) => {
                debug!(
                    "통계 반영 #{token}: 전체 {} / 열림 {}",
                    snapshot.total_tickets, snapshot.open_tickets
                );
                st.snapshot = Some(Arc::new(snapshot));
                FetchOutcome::Applied
            }
            Err(e) => {
                warn!("통계 조회 실패 #{token}: {e} (이전 스냅샷 유지)");
                FetchOutcome::Failed
            }
        }
    }

    /// 마지막 정상 스냅샷
    pub fn snapshot(&self) -> Option<Arc<StatsSnapshot>> {
        self.state.lock().snapshot.clone()
    }

    /// 긴급 티켓 수 (스냅샷이 없거나 키가 없으면 0)
    pub fn critical_count(&self) -> u64 {
        self.snapshot()
            .map(|s| s.priority_count(Priority::Critical))
            .unwrap_or(0)
    }

    pub fn observed_refresh(&self) -> u64 {
        self.state.lock().refresh_seen
    }

    /// 갱신 신호 구독 루프 (종료 신호까지)
    pub async fn run(
        self: Arc<Self>,
        mut subscription: RefreshSubscription,
        mut shutdown_rx: watch::Receiver<bool>,
        initial_fetch: bool,
    ) {
        info!("통계 집계 시작");

        if initial_fetch {
            self.on_refresh(subscription.observed()).await;
        }

        loop {
            tokio::select! {
                changed = subscription.changed() => match changed {
                    Some(signal) => {
                        self.on_refresh(signal).await;
                    }
                    None => break,
                },
                res = shutdown_rx.changed() => {
                    if res.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        subscription.unsubscribe();
        info!("통계 집계 종료");
    }
}
