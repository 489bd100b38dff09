//! 분류 제안 어드바이저.
//!
//! 설명 필드 blur 시 trim 길이가 임계값 이상이면 설명 스냅샷으로 분류를 요청한다.
//! 동시에 여러 요청이 있으면 마지막에 발급된 요청만 유효하다.
//! 실패는 로그만 남기고 삼킨다 (권고용, 비치명적).
//!
//! 초안에 병합할지는 폼(`DraftForm`)이 스냅샷 비교 후 결정한다.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};
use ticketdesk_core::error::CoreError;
use ticketdesk_core::models::classification::ClassificationSuggestion;
use ticketdesk_core::ports::ticket_repository::TicketRepository;

use crate::sequence::RequestSequence;

/// 기본 최소 설명 길이 (trim 후 문자 수)
pub const DEFAULT_MIN_DESCRIPTION_CHARS: usize = 10;

/// 어드바이저 요청 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advice {
    /// 설명이 너무 짧아 요청하지 않음
    TooShort,
    /// 응답이 왔지만 더 새 요청이 이미 발급됨
    Superseded,
    /// 요청 실패 (로그만 남김)
    Failed,
    /// 최신 요청의 제안
    Suggested(ClassificationSuggestion),
}

/// blur 한 번의 최종 결과 (폼 병합 판단 포함)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisoryOutcome {
    /// 설명이 너무 짧아 요청하지 않음
    TooShort,
    /// 초안에 카테고리/우선순위 적용
    Applied(ClassificationSuggestion),
    /// 더 새 요청이 있어 폐기
    Superseded,
    /// 요청 이후 설명이 바뀌어 폐기
    DescriptionChanged,
    /// 요청 이후 사용자가 카테고리/우선순위를 직접 바꿔 폐기
    ManualOverride,
    /// 요청 실패, 초안 유지
    Failed,
}

#[derive(Debug, Default)]
struct AdvisorState {
    requests: RequestSequence,
    /// 가장 최근에 정착한 최신 요청 토큰
    settled: u64,
}

/// 분류 제안 어드바이저
pub struct ClassificationAdvisor {
    repo: Arc<dyn TicketRepository>,
    min_description_chars: usize,
    state: Mutex<AdvisorState>,
}

impl ClassificationAdvisor {
    /// 새 어드바이저 생성
    pub fn new(repo: Arc<dyn TicketRepository>, min_description_chars: usize) -> Self {
        Self {
            repo,
            min_description_chars,
            state: Mutex::new(AdvisorState::default()),
        }
    }

    pub fn min_description_chars(&self) -> usize {
        self.min_description_chars
    }

    /// 최신 요청이 아직 진행 중인지 (UI 로딩 표시)
    pub fn classifying(&self) -> bool {
        let st = self.state.lock();
        st.settled < st.requests.latest()
    }

    /// 요청 대상이 되는 설명인지
    pub fn is_eligible(&self, description: &str) -> bool {
        description.trim().chars().count() >= self.min_description_chars
    }

    /// 설명 스냅샷으로 분류 요청
    pub async fn suggest(&self, snapshot: &str) -> Advice {
        if !self.is_eligible(snapshot) {
            debug!("설명이 짧아 분류 생략");
            return Advice::TooShort;
        }

        let token = self.state.lock().requests.issue();
        debug!("분류 요청 발급 #{token}");

        let result = self.repo.classify(snapshot).await;

        let mut st = self.state.lock();
        if !st.requests.is_latest(token) {
            debug!(
                "오래된 분류 응답 폐기 #{token} (최신 #{})",
                st.requests.latest()
            );
            return Advice::Superseded;
        }
        st.settled = token;

        match result {
            Ok(suggestion) => {
                debug!(
                    "분류 제안 #{token}: {} / {}",
                    suggestion.category, suggestion.priority
                );
                Advice::Suggested(suggestion)
            }
            Err(e) => {
                let err = CoreError::Advisory(e.to_string());
                warn!("{err}, 수동 선택으로 진행");
                Advice::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{server_error, wait_until, MockRepository};
    use assert_matches::assert_matches;
    use ticketdesk_core::models::ticket::{Category, Priority};

    const DESCRIPTION: &str = "App crashes on login page repeatedly";

    fn suggestion(category: Category, priority: Priority) -> ClassificationSuggestion {
        ClassificationSuggestion { category, priority }
    }

    fn setup() -> (Arc<MockRepository>, Arc<ClassificationAdvisor>) {
        let repo = Arc::new(MockRepository::default());
        let advisor = Arc::new(ClassificationAdvisor::new(
            repo.clone(),
            DEFAULT_MIN_DESCRIPTION_CHARS,
        ));
        (repo, advisor)
    }

    #[tokio::test]
    async fn short_description_is_noop() {
        let (repo, advisor) = setup();
        assert_eq!(advisor.suggest("  too short  ").await, Advice::TooShort);
        assert_eq!(advisor.suggest("123456789").await, Advice::TooShort);
        assert_eq!(repo.classify_call_count(), 0);
        assert!(!advisor.classifying());
    }

    #[tokio::test]
    async fn threshold_uses_trimmed_char_count() {
        let (repo, advisor) = setup();
        repo.push_classify(Ok(suggestion(Category::Account, Priority::Low)));

        // 공백 제외 정확히 10자
        let advice = advisor.suggest("   가나다라마바사아자차   ").await;
        assert_matches!(advice, Advice::Suggested(_));
        assert_eq!(repo.classify_call_count(), 1);
    }

    #[tokio::test]
    async fn success_returns_suggestion_and_sends_snapshot() {
        let (repo, advisor) = setup();
        repo.push_classify(Ok(suggestion(Category::Technical, Priority::High)));

        let advice = advisor.suggest(DESCRIPTION).await;
        assert_eq!(
            advice,
            Advice::Suggested(suggestion(Category::Technical, Priority::High))
        );
        assert_eq!(repo.classify_calls.lock()[0], DESCRIPTION);
    }

    #[tokio::test]
    async fn failure_is_swallowed() {
        let (repo, advisor) = setup();
        repo.push_classify(Err(server_error()));

        assert_eq!(advisor.suggest(DESCRIPTION).await, Advice::Failed);
        assert!(!advisor.classifying());
    }

    #[tokio::test]
    async fn older_response_is_superseded() {
        let (repo, advisor) = setup();
        let first = repo.gate_classify();
        let second = repo.gate_classify();

        let a = tokio::spawn({
            let advisor = advisor.clone();
            async move { advisor.suggest(DESCRIPTION).await }
        });
        wait_until(|| repo.classify_call_count() == 1).await;
        let b = tokio::spawn({
            let advisor = advisor.clone();
            async move { advisor.suggest("Billing page shows a wrong amount").await }
        });
        wait_until(|| repo.classify_call_count() == 2).await;
        assert!(advisor.classifying());

        // 이전 요청이 먼저 도착해도 폐기, 로딩 유지
        first
            .send(Ok(suggestion(Category::Technical, Priority::High)))
            .unwrap();
        assert_eq!(a.await.unwrap(), Advice::Superseded);
        assert!(advisor.classifying());

        second
            .send(Ok(suggestion(Category::Billing, Priority::Medium)))
            .unwrap();
        assert_eq!(
            b.await.unwrap(),
            Advice::Suggested(suggestion(Category::Billing, Priority::Medium))
        );
        assert!(!advisor.classifying());
    }

    #[tokio::test]
    async fn older_response_after_newer_settled_is_still_superseded() {
        let (repo, advisor) = setup();
        let first = repo.gate_classify();
        repo.push_classify(Ok(suggestion(Category::Billing, Priority::Low)));

        let a = tokio::spawn({
            let advisor = advisor.clone();
            async move { advisor.suggest(DESCRIPTION).await }
        });
        wait_until(|| repo.classify_call_count() == 1).await;

        assert_matches!(advisor.suggest(DESCRIPTION).await, Advice::Suggested(_));
        assert!(!advisor.classifying());

        first
            .send(Ok(suggestion(Category::Technical, Priority::Critical)))
            .unwrap();
        assert_eq!(a.await.unwrap(), Advice::Superseded);
        assert!(!advisor.classifying());
    }
}
