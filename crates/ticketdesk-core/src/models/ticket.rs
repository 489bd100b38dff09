//! 티켓 모델.
//!
//! 서버가 소유하는 티켓과 닫힌 enum 집합(카테고리/우선순위/상태).
//! 알 수 없는 enum 문자열은 역직렬화 단계에서 에러가 된다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 제목 최대 길이 (문자 수)
pub const TITLE_MAX_CHARS: usize = 200;

/// 불투명 티켓 식별자
///
/// 서버는 정수 PK를 내려주지만 클라이언트는 값의 의미를 해석하지 않는다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TicketId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => TicketId(n.to_string()),
            RawId::Text(s) => TicketId(s),
        })
    }
}

/// 티켓 카테고리
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Billing,
    Technical,
    Account,
    General,
}

/// 티켓 우선순위
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

/// 티켓 처리 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Open,
    InProgress,
    Resolved,
    Closed,
}

/// enum ↔ 와이어 문자열 변환을 한 곳에서 정의
macro_rules! wire_enum {
    ($ty:ident, $field:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            /// 전체 값 (선언 순서)
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// 와이어 문자열
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($ty::$variant),)+
                    other => Err(CoreError::validation(
                        $field,
                        format!("알 수 없는 값: {other}"),
                    )),
                }
            }
        }
    };
}

wire_enum!(Category, "category", {
    Billing => "billing",
    Technical => "technical",
    Account => "account",
    General => "general",
});

wire_enum!(Priority, "priority", {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

wire_enum!(Status, "status", {
    Open => "open",
    InProgress => "in_progress",
    Resolved => "resolved",
    Closed => "closed",
});

/// 서버에 저장된 티켓
///
/// 생성 이후에는 상태 전이로만 변경되며, 이 범위에서는 삭제되지 않는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}
