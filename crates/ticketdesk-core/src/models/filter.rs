//! 필터 상태와 정규화된 목록 쿼리.
//!
//! 빈 문자열과 미설정은 동일하게 "제약 없음"으로 취급한다.
//! 쿼리 필드 순서는 search → category → priority → status 로 고정.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::ticket::{Category, Priority, Status};

/// 목록 화면의 필터 상태
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// 제목/설명 검색어
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<Status>,
}

impl FilterState {
    /// UI 원시 문자열로부터 생성 (`""` = 미설정)
    pub fn from_raw(
        search: &str,
        category: &str,
        priority: &str,
        status: &str,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            search: search.to_string(),
            category: parse_optional(category)?,
            priority: parse_optional(priority)?,
            status: parse_optional(status)?,
        })
    }

    /// 어떤 제약도 없는지
    pub fn is_unconstrained(&self) -> bool {
        build_query(self).is_empty()
    }
}

fn parse_optional<T>(raw: &str) -> Result<Option<T>, CoreError>
where
    T: std::str::FromStr<Err = CoreError>,
{
    let raw = raw.trim();
    if raw.is_empty() {
        Ok(None)
    } else {
        raw.parse().map(Some)
    }
}

/// 정규화된 목록 쿼리 파라미터 (빈 값 없음, 고정 순서)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketQuery {
    params: Vec<(&'static str, String)>,
}

impl TicketQuery {
    /// (키, 값) 쌍, 고정 순서
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.params
    }

    /// 키로 값 조회
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// URL 인코딩된 쿼리 문자열 (`category=billing&status=open`)
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }
}

/// FilterState → TicketQuery
///
/// 부수효과 없음. 공백뿐인 검색어는 빈 값으로 취급한다.
pub fn build_query(filters: &FilterState) -> TicketQuery {
    let mut params = Vec::with_capacity(4);

    if !filters.search.trim().is_empty() {
        params.push(("search", filters.search.clone()));
    }
    if let Some(category) = filters.category {
        params.push(("category", category.as_str().to_string()));
    }
    if let Some(priority) = filters.priority {
        params.push(("priority", priority.as_str().to_string()));
    }
    if let Some(status) = filters.status {
        params.push(("status", status.as_str().to_string()));
    }

    TicketQuery { params }
}
