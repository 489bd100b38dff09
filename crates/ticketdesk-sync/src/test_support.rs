//! 테스트용 스크립트 저장소.
//!
//! 호출마다 미리 넣어둔 응답을 순서대로 꺼낸다. `gate_*`로 넣은 응답은
//! 테스트가 oneshot으로 값을 보낼 때까지 대기하므로 응답 도착 순서를 제어할 수 있다.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::oneshot;
use ticketdesk_core::error::CoreError;
use ticketdesk_core::models::classification::ClassificationSuggestion;
use ticketdesk_core::models::draft::DraftTicket;
use ticketdesk_core::models::filter::TicketQuery;
use ticketdesk_core::models::stats::StatsSnapshot;
use ticketdesk_core::models::ticket::{Category, Priority, Status, Ticket, TicketId};
use ticketdesk_core::ports::ticket_repository::TicketRepository;

pub(crate) type Gate<T> = oneshot::Sender<Result<T, CoreError>>;

enum Reply<T> {
    Now(Result<T, CoreError>),
    Gated(oneshot::Receiver<Result<T, CoreError>>),
}

struct Script<T> {
    replies: Mutex<VecDeque<Reply<T>>>,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
        }
    }
}

impl<T> Script<T> {
    fn push(&self, reply: Result<T, CoreError>) {
        self.replies.lock().push_back(Reply::Now(reply));
    }

    fn gate(&self) -> Gate<T> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().push_back(Reply::Gated(rx));
        tx
    }

    async fn next(&self, what: &str) -> Result<T, CoreError> {
        let reply = self.replies.lock().pop_front();
        match reply {
            Some(Reply::Now(result)) => result,
            Some(Reply::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(CoreError::Transport(format!("{what} 게이트 닫힘")))),
            None => Err(CoreError::Transport(format!("{what} 응답 스크립트 없음"))),
        }
    }
}

/// 스크립트 기반 `TicketRepository`
#[derive(Default)]
pub(crate) struct MockRepository {
    list: Script<Vec<Ticket>>,
    create: Script<Ticket>,
    patch: Script<Ticket>,
    stats: Script<StatsSnapshot>,
    classify: Script<ClassificationSuggestion>,
    pub list_calls: Mutex<Vec<TicketQuery>>,
    pub create_calls: Mutex<Vec<DraftTicket>>,
    pub patch_calls: Mutex<Vec<(TicketId, Status)>>,
    pub stats_calls: Mutex<usize>,
    pub classify_calls: Mutex<Vec<String>>,
}

impl MockRepository {
    pub fn push_list(&self, reply: Result<Vec<Ticket>, CoreError>) {
        self.list.push(reply);
    }

    pub fn gate_list(&self) -> Gate<Vec<Ticket>> {
        self.list.gate()
    }

    pub fn push_create(&self, reply: Result<Ticket, CoreError>) {
        self.create.push(reply);
    }

    pub fn gate_create(&self) -> Gate<Ticket> {
        self.create.gate()
    }

    pub fn push_patch(&self, reply: Result<Ticket, CoreError>) {
        self.patch.push(reply);
    }

    pub fn gate_patch(&self) -> Gate<Ticket> {
        self.patch.gate()
    }

    pub fn push_stats(&self, reply: Result<StatsSnapshot, CoreError>) {
        self.stats.push(reply);
    }

    pub fn gate_stats(&self) -> Gate<StatsSnapshot> {
        self.stats.gate()
    }

    pub fn push_classify(&self, reply: Result<ClassificationSuggestion, CoreError>) {
        self.classify.push(reply);
    }

    pub fn gate_classify(&self) -> Gate<ClassificationSuggestion> {
        self.classify.gate()
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.lock().len()
    }

    pub fn stats_call_count(&self) -> usize {
        *self.stats_calls.lock()
    }

    pub fn classify_call_count(&self) -> usize {
        self.classify_calls.lock().len()
    }
}

#[async_trait]
impl TicketRepository for MockRepository {
    async fn list_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>, CoreError> {
        self.list_calls.lock().push(query.clone());
        self.list.next("list").await
    }

    async fn create_ticket(&self, draft: &DraftTicket) -> Result<Ticket, CoreError> {
        self.create_calls.lock().push(draft.clone());
        self.create.next("create").await
    }

    async fn patch_status(&self, id: &TicketId, status: Status) -> Result<Ticket, CoreError> {
        self.patch_calls.lock().push((id.clone(), status));
        self.patch.next("patch").await
    }

    async fn get_stats(&self) -> Result<StatsSnapshot, CoreError> {
        *self.stats_calls.lock() += 1;
        self.stats.next("stats").await
    }

    async fn classify(&self, description: &str) -> Result<ClassificationSuggestion, CoreError> {
        self.classify_calls.lock().push(description.to_string());
        self.classify.next("classify").await
    }
}

pub(crate) fn ticket(id: &str, title: &str, status: Status) -> Ticket {
    Ticket {
        id: TicketId::new(id),
        title: title.to_string(),
        description: format!("{title} 상세 설명"),
        category: Category::General,
        priority: Priority::Medium,
        status,
        created_at: Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap(),
    }
}

pub(crate) fn stats(total: u64, open: u64) -> StatsSnapshot {
    StatsSnapshot {
        total_tickets: total,
        open_tickets: open,
        avg_tickets_per_day: total as f64 / 2.0,
        priority_breakdown: [(Priority::Critical, total / 2)].into_iter().collect(),
        category_breakdown: Default::default(),
    }
}

pub(crate) fn server_error() -> CoreError {
    CoreError::Server {
        status: 500,
        message: "Internal Server Error".to_string(),
    }
}

/// 조건이 참이 될 때까지 다른 태스크에 양보
pub(crate) async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..1_000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("조건이 충족되지 않음");
}
