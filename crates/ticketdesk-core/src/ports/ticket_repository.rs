//! 티켓 저장소 포트.
//!
//! 구현: `ticketdesk-network` crate (reqwest)
//!
//! 모든 호출은 `CoreError::Transport`(응답 없음) 또는 `CoreError::Server`(2xx 이외)로
//! 실패할 수 있다. 구현체는 내부적으로 재시도하지 않는다.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::classification::ClassificationSuggestion;
use crate::models::draft::DraftTicket;
use crate::models::filter::TicketQuery;
use crate::models::stats::StatsSnapshot;
use crate::models::ticket::{Status, Ticket, TicketId};

/// 백엔드 티켓 API 경계
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// 필터 쿼리로 티켓 목록 조회 (최신순)
    async fn list_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>, CoreError>;

    /// 초안으로 티켓 생성 (상태는 서버에서 `open`으로 설정)
    async fn create_ticket(&self, draft: &DraftTicket) -> Result<Ticket, CoreError>;

    /// 티켓 상태 변경
    async fn patch_status(&self, id: &TicketId, status: Status) -> Result<Ticket, CoreError>;

    /// 집계 통계 조회
    async fn get_stats(&self) -> Result<StatsSnapshot, CoreError>;

    /// 설명 텍스트에 대한 분류 제안
    async fn classify(&self, description: &str) -> Result<ClassificationSuggestion, CoreError>;
}
