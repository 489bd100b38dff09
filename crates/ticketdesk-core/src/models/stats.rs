//! 대시보드 통계 스냅샷.
//!
//! 서버에서 매번 통째로 다시 계산되며, 클라이언트는 부분 병합하지 않는다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::ticket::{Category, Priority};

/// `GET /tickets/stats/` 응답
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_tickets: u64,
    pub open_tickets: u64,
    pub avg_tickets_per_day: f64,
    /// 우선순위별 건수 (키 없음 = 0건)
    pub priority_breakdown: BTreeMap<Priority, u64>,
    /// 카테고리별 건수 (구버전 서버는 생략)
    #[serde(default)]
    pub category_breakdown: BTreeMap<Category, u64>,
}

impl StatsSnapshot {
    /// 우선순위별 건수
    pub fn priority_count(&self, priority: Priority) -> u64 {
        self.priority_breakdown.get(&priority).copied().unwrap_or(0)
    }

    /// 카테고리별 건수
    pub fn category_count(&self, category: Category) -> u64 {
        self.category_breakdown.get(&category).copied().unwrap_or(0)
    }
}
