//! # ticketdesk-sync
//!
//! 클라이언트 동기화 레이어.
//! 필터 상태와 갱신 신호를 단일 목록 조회로 합치고, 설명 blur 시 분류 제안을
//! 받아 초안에 병합하며, 변경 작업 성공 시 갱신 신호로 목록/통계를 재조회한다.
//! 겹치는 요청은 컴포넌트별 순서 토큰으로 마지막 발급분만 반영한다.

pub mod advisor;
pub mod form;
pub mod presenter;
pub mod refresh;
pub mod sequence;
pub mod stats;
pub mod ticket_list;

#[cfg(test)]
mod test_support;
