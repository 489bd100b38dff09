//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 어댑터 crate가 이 trait을 구현하며,
//! `ticketdesk-app`에서 `Arc<dyn T>`로 와이어링한다.
//!
//! 모든 async trait은 `async_trait` 매크로를 사용하여
//! object safety를 보장한다.

pub mod ticket_repository;
