//! 분류 제안 모델.
//!
//! `POST /tickets/classify/` 응답. 권고용이며 자동 적용이 보장되지 않는다.

use serde::{Deserialize, Serialize};

use crate::models::ticket::{Category, Priority};

/// 설명 스냅샷에 대한 카테고리/우선순위 제안
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSuggestion {
    #[serde(rename = "suggested_category")]
    pub category: Category,
    #[serde(rename = "suggested_priority")]
    pub priority: Priority,
}
