//! 티켓 작성 폼.
//!
//! 초안(`DraftTicket`)의 유일한 소유자. 설명 blur 시 분류 제안을 받아
//! 병합하고, 제출 시 검증 → 생성 → 초안 초기화 → 갱신 신호 발행 순으로 진행한다.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};
use ticketdesk_core::error::CoreError;
use ticketdesk_core::models::draft::DraftTicket;
use ticketdesk_core::models::ticket::{Category, Priority, Ticket};
use ticketdesk_core::ports::ticket_repository::TicketRepository;

use crate::advisor::{Advice, AdvisoryOutcome, ClassificationAdvisor};
use crate::refresh::RefreshCoordinator;

#[derive(Debug, Default)]
struct FormState {
    draft: DraftTicket,
    /// 카테고리/우선순위 수동 변경 횟수
    classification_edits: u64,
    submitting: bool,
}

/// 티켓 작성 폼
pub struct DraftForm {
    repo: Arc<dyn TicketRepository>,
    refresh: RefreshCoordinator,
    advisor: ClassificationAdvisor,
    state: Mutex<FormState>,
}

impl DraftForm {
    pub fn new(
        repo: Arc<dyn TicketRepository>,
        refresh: RefreshCoordinator,
        min_description_chars: usize,
    ) -> Self {
        Self {
            advisor: ClassificationAdvisor::new(repo.clone(), min_description_chars),
            repo,
            refresh,
            state: Mutex::new(FormState::default()),
        }
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.state.lock().draft.title = title.into();
    }

    pub fn set_description(&self, description: impl Into<String>) {
        self.state.lock().draft.description = description.into();
    }

    /// 사용자가 카테고리를 직접 선택
    pub fn set_category(&self, category: Category) {
        let mut st = self.state.lock();
        st.draft.category = category;
        st.classification_edits += 1;
    }

    /// 사용자가 우선순위를 직접 선택
    pub fn set_priority(&self, priority: Priority) {
        let mut st = self.state.lock();
        st.draft.priority = priority;
        st.classification_edits += 1;
    }

    /// 현재 초안 사본
    pub fn draft(&self) -> DraftTicket {
        self.state.lock().draft.clone()
    }

    pub fn min_description_chars(&self) -> usize {
        self.advisor.min_description_chars()
    }

    /// 분류 제안 대기 중인지
    pub fn classifying(&self) -> bool {
        self.advisor.classifying()
    }

    /// 제출 진행 중인지
    pub fn submitting(&self) -> bool {
        self.state.lock().submitting
    }

    /// 설명 필드 blur
    ///
    /// 응답 도착 시점에 설명이 스냅샷과 같고, 요청 이후 카테고리/우선순위를
    /// 손대지 않았을 때만 제안을 초안에 반영한다.
    pub async fn blur_description(&self) -> AdvisoryOutcome {
        let (snapshot, edits_at_issue) = {
            let st = self.state.lock();
            (st.draft.description.clone(), st.classification_edits)
        };

        let suggestion = match self.advisor.suggest(&snapshot).await {
            Advice::TooShort => return AdvisoryOutcome::TooShort,
            Advice::Superseded => return AdvisoryOutcome::Superseded,
            Advice::Failed => return AdvisoryOutcome::Failed,
            Advice::Suggested(suggestion) => suggestion,
        };

        let mut st = self.state.lock();
        if st.draft.description != snapshot {
            debug!("설명이 바뀌어 분류 제안 폐기");
            return AdvisoryOutcome::DescriptionChanged;
        }
        if st.classification_edits != edits_at_issue {
            debug!("수동 선택이 있어 분류 제안 폐기");
            return AdvisoryOutcome::ManualOverride;
        }

        st.draft.category = suggestion.category;
        st.draft.priority = suggestion.priority;
        info!(
            "분류 제안 적용: {} / {}",
            suggestion.category, suggestion.priority
        );
        AdvisoryOutcome::Applied(suggestion)
    }

    /// 초안 제출
    ///
    /// 검증 실패 시 요청하지 않는다. 성공하면 초안을 비우고 갱신 신호를 발행한다.
    /// 실패하면 초안을 유지하고 신호는 발행하지 않는다.
    pub async fn submit(&self) -> Result<Ticket, CoreError> {
        let draft = {
            let mut st = self.state.lock();
            if st.submitting {
                return Err(CoreError::validation("form", "이미 제출 중입니다"));
            }
            st.draft.validate()?;
            st.submitting = true;
            st.draft.clone()
        };
        debug!("티켓 제출: {}", draft.title);

        let result = self.repo.create_ticket(&draft).await;

        {
            let mut st = self.state.lock();
            st.submitting = false;
            match &result {
                Ok(ticket) => {
                    info!("티켓 생성됨: #{}", ticket.id);
                    st.draft = DraftTicket::default();
                }
                Err(e) => warn!("티켓 생성 실패: {e} (초안 유지)"),
            }
        }

        if result.is_ok() {
            self.refresh.bump();
        }
        result
    }
}
