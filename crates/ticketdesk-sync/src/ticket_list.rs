//! 티켓 목록 동기화.
//!
//! 필터 상태 또는 갱신 신호가 바뀔 때마다 목록을 재조회한다.
//! 표시되는 목록은 항상 가장 최근에 "발급된" 쿼리의 결과이며,
//! 늦게 도착한 이전 응답은 버린다. 조회 실패 시 마지막 정상 목록을 유지한다.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use ticketdesk_core::error::CoreError;
use ticketdesk_core::models::filter::{build_query, FilterState};
use ticketdesk_core::models::ticket::{Status, Ticket, TicketId};
use ticketdesk_core::ports::ticket_repository::TicketRepository;

use crate::refresh::{RefreshCoordinator, RefreshSubscription};
use crate::sequence::{FetchOutcome, RequestSequence};

/// 상태 변경 실패 기록 (UI 알림용)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFailure {
    pub ticket_id: TicketId,
    /// 사용자가 요청한 상태
    pub attempted: Status,
    /// 되돌아간 상태 (마지막으로 알려진 서버 상태)
    pub reverted_to: Option<Status>,
    pub message: String,
}

/// 상태 컨트롤에 표시 중인 미확정 값
#[derive(Debug, Clone, Copy)]
enum PendingStatus {
    /// PATCH 진행 중
    InFlight { token: u64, status: Status },
    /// PATCH 성공, 다음 목록 반영 대기
    Confirmed(Status),
}

impl PendingStatus {
    fn status(&self) -> Status {
        match self {
            PendingStatus::InFlight { status, .. } | PendingStatus::Confirmed(status) => *status,
        }
    }
}

#[derive(Debug, Default)]
struct ListState {
    filters: FilterState,
    refresh_seen: u64,
    fetches: RequestSequence,
    loading: bool,
    tickets: Vec<Ticket>,
    error: Option<Arc<CoreError>>,
    status_tokens: RequestSequence,
    pending_status: HashMap<TicketId, PendingStatus>,
    status_failure: Option<StatusFailure>,
}

/// 티켓 목록 동기화기
pub struct TicketListSynchronizer {
    repo: Arc<dyn TicketRepository>,
    refresh: RefreshCoordinator,
    state: Mutex<ListState>,
}

impl TicketListSynchronizer {
    /// 새 동기화기 생성 (빈 필터, 빈 목록)
    pub fn new(repo: Arc<dyn TicketRepository>, refresh: RefreshCoordinator) -> Self {
        Self {
            repo,
            refresh,
            state: Mutex::new(ListState::default()),
        }
    }

    /// 필터 변경 → 재조회
    ///
    /// 같은 필터면 요청하지 않고 `None`.
    pub async fn set_filters(&self, filters: FilterState) -> Option<FetchOutcome> {
        {
            let mut st = self.state.lock();
            if st.filters == filters {
                return None;
            }
            st.filters = filters;
        }
        Some(self.fetch().await)
    }

    /// 갱신 신호 관측 → 재조회
    pub async fn on_refresh(&self, signal: u64) -> FetchOutcome {
        self.state.lock().refresh_seen = signal;
        self.fetch().await
    }

    /// 사용자 요청 재조회 (에러 후 재시도 등)
    pub async fn refetch(&self) -> FetchOutcome {
        self.fetch().await
    }

    async fn fetch(&self) -> FetchOutcome {
        let (token, query) = {
            let mut st = self.state.lock();
            st.loading = true;
            (st.fetches.issue(), build_query(&st.filters))
        };
        debug!("목록 조회 발급 #{token}: ?{}", query.to_query_string());

        let result = self.repo.list_tickets(&query).await;

        let mut st = self.state.lock();
        if !st.fetches.is_latest(token) {
            debug!(
                "오래된 목록 응답 폐기 #{token} (최신 #{})",
                st.fetches.latest()
            );
            return FetchOutcome::Stale;
        }
        st.loading = false;

        match result {
            Ok(tickets) => {
                debug!("목록 반영 #{token}: {}건", tickets.len());
                st.tickets = tickets;
                st.error = None;
                st.pending_status
                    .retain(|_, p| matches!(p, PendingStatus::InFlight { .. }));
                FetchOutcome::Applied
            }
            Err(e) => {
                warn!("목록 조회 실패 #{token}: {e} (이전 목록 유지)");
                st.error = Some(Arc::new(e));
                FetchOutcome::Failed
            }
        }
    }

    /// 목록 항목에서 상태 변경
    ///
    /// 성공 시 로컬 목록을 직접 고치지 않고 갱신 신호만 발행한다.
    /// 실패 시 상태 컨트롤은 마지막으로 알려진 상태로 되돌아가며 신호는 발행하지 않는다.
    pub async fn update_status(&self, id: &TicketId, status: Status) -> Result<Ticket, CoreError> {
        let token = {
            let mut st = self.state.lock();
            let token = st.status_tokens.issue();
            st.pending_status
                .insert(id.clone(), PendingStatus::InFlight { token, status });
            st.status_failure = None;
            token
        };
        debug!("상태 변경 발급: {id} → {status}");

        let result = self.repo.patch_status(id, status).await;

        {
            let mut st = self.state.lock();
            let ours = matches!(
                st.pending_status.get(id),
                Some(PendingStatus::InFlight { token: t, .. }) if *t == token
            );

            match &result {
                Ok(_) if ours => {
                    st.pending_status
                        .insert(id.clone(), PendingStatus::Confirmed(status));
                }
                Ok(_) => {}
                Err(e) => {
                    if ours {
                        st.pending_status.remove(id);
                    }
                    let reverted_to = Self::known_status(&st, id);
                    warn!("상태 변경 실패: {id} → {status}: {e}");
                    st.status_failure = Some(StatusFailure {
                        ticket_id: id.clone(),
                        attempted: status,
                        reverted_to,
                        message: e.to_string(),
                    });
                }
            }
        }

        if result.is_ok() {
            self.refresh.bump();
        }
        result
    }

    fn known_status(st: &ListState, id: &TicketId) -> Option<Status> {
        st.tickets.iter().find(|t| &t.id == id).map(|t| t.status)
    }

    /// 상태 컨트롤에 보여줄 값 (진행 중 변경 > 마지막 서버 상태)
    pub fn displayed_status(&self, id: &TicketId) -> Option<Status> {
        let st = self.state.lock();
        st.pending_status
            .get(id)
            .map(PendingStatus::status)
            .or_else(|| Self::known_status(&st, id))
    }

    /// 마지막으로 반영된 서버 상태
    pub fn last_known_status(&self, id: &TicketId) -> Option<Status> {
        Self::known_status(&self.state.lock(), id)
    }

    /// 현재 표시 목록
    pub fn tickets(&self) -> Vec<Ticket> {
        self.state.lock().tickets.clone()
    }

    pub fn filters(&self) -> FilterState {
        self.state.lock().filters.clone()
    }

    /// 최신 조회 실패 (성공하면 지워짐)
    pub fn error(&self) -> Option<Arc<CoreError>> {
        self.state.lock().error.clone()
    }

    /// 최근 상태 변경 실패
    pub fn status_failure(&self) -> Option<StatusFailure> {
        self.state.lock().status_failure.clone()
    }

    /// 상태 변경 실패 알림 닫기
    pub fn dismiss_status_failure(&self) {
        self.state.lock().status_failure = None;
    }

    /// 최신 요청이 진행 중인지
    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    /// 마지막으로 관측한 갱신 신호 값
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
        info!("목록 동기화 시작");

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
        info!("목록 동기화 종료");
    }
}
