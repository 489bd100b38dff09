//! 초안 티켓 모델.
//!
//! 폼이 단독 소유하는 제출 전 스테이징 데이터. id/status/created_at 없음.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::ticket::{Category, Priority, TITLE_MAX_CHARS};

/// 제출 전 티켓 초안 (`POST /tickets/` 본문)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftTicket {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
}

impl Default for DraftTicket {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: Category::General,
            priority: Priority::Low,
        }
    }
}

impl DraftTicket {
    /// 제출 전 클라이언트 측 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::validation("title", "제목이 비어 있습니다"));
        }
        let title_chars = self.title.chars().count();
        if title_chars > TITLE_MAX_CHARS {
            return Err(CoreError::validation(
                "title",
                format!("제목은 {TITLE_MAX_CHARS}자 이하여야 합니다 (현재 {title_chars}자)"),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(CoreError::validation("description", "설명이 비어 있습니다"));
        }
        Ok(())
    }
}
