//! HTTP REST API 클라이언트.
//!
//! `TicketRepository` 포트 구현. 재시도하지 않으며,
//! 실패는 전송(`Transport`)/서버(`Server`)/응답 해석(`MalformedResponse`)으로 구분한다.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use ticketdesk_core::error::CoreError;
use ticketdesk_core::models::classification::ClassificationSuggestion;
use ticketdesk_core::models::draft::DraftTicket;
use ticketdesk_core::models::filter::TicketQuery;
use ticketdesk_core::models::stats::StatsSnapshot;
use ticketdesk_core::models::ticket::{Status, Ticket, TicketId};
use ticketdesk_core::ports::ticket_repository::TicketRepository;

/// REST API 클라이언트 (`TicketRepository` 포트 구현)
pub struct HttpTicketRepository {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTicketRepository {
    /// 새 HTTP 클라이언트 생성
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Config(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 요청 전송 → 상태 코드 확인 → JSON 디코딩
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<T, CoreError> {
        let resp = request
            .send()
            .await
            .map_err(|e| map_transport_error(what, e))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| map_transport_error(what, e))?;

        if !status.is_success() {
            warn!("{what} 실패: HTTP {status}");
            return Err(CoreError::Server {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| CoreError::MalformedResponse(format!("{what} 응답 파싱 실패: {e}")))
    }
}

/// reqwest 에러 → `CoreError::Transport`
fn map_transport_error(what: &str, e: reqwest::Error) -> CoreError {
    if e.is_timeout() {
        CoreError::Transport(format!("{what} 타임아웃: {e}"))
    } else {
        CoreError::Transport(format!("{what} 요청 실패: {e}"))
    }
}

#[async_trait]
impl TicketRepository for HttpTicketRepository {
    async fn list_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>, CoreError> {
        let mut url = self.url("/tickets/");
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.to_query_string());
        }
        debug!("티켓 목록 요청: {url}");

        let tickets: Vec<Ticket> = self.execute(self.client.get(&url), "티켓 목록").await?;
        debug!("티켓 목록 수신: {}건", tickets.len());
        Ok(tickets)
    }

    async fn create_ticket(&self, draft: &DraftTicket) -> Result<Ticket, CoreError> {
        debug!("티켓 생성 요청: {}", draft.title);

        let req = self.client.post(self.url("/tickets/")).json(draft);
        let ticket: Ticket = self.execute(req, "티켓 생성").await?;

        debug!("티켓 생성 성공: id={}", ticket.id);
        Ok(ticket)
    }

    async fn patch_status(&self, id: &TicketId, status: Status) -> Result<Ticket, CoreError> {
        debug!("상태 변경 요청: id={id} → {status}");

        let body = serde_json::json!({ "status": status });
        let req = self
            .client
            .patch(self.url(&format!("/tickets/{id}/")))
            .json(&body);
        self.execute(req, "상태 변경").await
    }

    async fn get_stats(&self) -> Result<StatsSnapshot, CoreError> {
        debug!("통계 요청");
        self.execute(self.client.get(self.url("/tickets/stats/")), "통계")
            .await
    }

    async fn classify(&self, description: &str) -> Result<ClassificationSuggestion, CoreError> {
        debug!("분류 요청: {}자", description.chars().count());

        let body = serde_json::json!({ "description": description });
        let req = self
            .client
            .post(self.url("/tickets/classify/"))
            .json(&body);
        self.execute(req, "분류").await
    }
}
