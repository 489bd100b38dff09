//! DI 와이어링.
//!
//! 설정 → HTTP 어댑터 → 동기화 컴포넌트. 모든 컴포넌트가 같은
//! `RefreshCoordinator`를 공유해야 변경 작업 후 목록/통계가 재조회된다.

use std::sync::Arc;
use ticketdesk_core::config::AppConfig;
use ticketdesk_core::error::CoreError;
use ticketdesk_core::ports::ticket_repository::TicketRepository;
use ticketdesk_network::http_client::HttpTicketRepository;
use ticketdesk_sync::form::DraftForm;
use ticketdesk_sync::refresh::RefreshCoordinator;
use ticketdesk_sync::stats::StatsAggregator;
use ticketdesk_sync::ticket_list::TicketListSynchronizer;
use tracing::debug;

/// 조립된 클라이언트 컴포넌트
pub struct Services {
    pub refresh: RefreshCoordinator,
    pub list: Arc<TicketListSynchronizer>,
    pub stats: Arc<StatsAggregator>,
    pub form: Arc<DraftForm>,
}

impl Services {
    /// 설정으로 HTTP 어댑터를 만들고 컴포넌트를 조립
    pub fn from_config(config: &AppConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let repo = HttpTicketRepository::new(&config.server.base_url, config.request_timeout())?;
        Ok(Self::with_repository(Arc::new(repo), config))
    }

    /// 주어진 저장소로 컴포넌트 조립
    pub fn with_repository(repo: Arc<dyn TicketRepository>, config: &AppConfig) -> Self {
        let refresh = RefreshCoordinator::new();
        debug!(
            "컴포넌트 조립 (분류 최소 길이 {}자)",
            config.advisor.min_description_chars
        );
        Self {
            list: Arc::new(TicketListSynchronizer::new(repo.clone(), refresh.clone())),
            stats: Arc::new(StatsAggregator::new(repo.clone())),
            form: Arc::new(DraftForm::new(
                repo,
                refresh.clone(),
                config.advisor.min_description_chars,
            )),
            refresh,
        }
    }
}
