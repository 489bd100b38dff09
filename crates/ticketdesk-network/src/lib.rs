//! # ticketdesk-network
//!
//! 티켓 백엔드 HTTP 어댑터.
//! `/tickets/` JSON API를 호출해 `TicketRepository` 포트를 구현한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use ticketdesk_network::http_client::HttpTicketRepository;
//!
//! let repo = HttpTicketRepository::new("http://localhost:8000/api", Duration::from_secs(30))?;
//! let tickets = repo.list_tickets(&query).await?;
//! ```

pub mod http_client;
