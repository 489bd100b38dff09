//! 티켓/통계 프레젠터.
//!
//! Ticket, StatsSnapshot → 화면 표시용 데이터 변환.

use chrono::{DateTime, Utc};
use ticketdesk_core::models::stats::StatsSnapshot;
use ticketdesk_core::models::ticket::{Priority, Status, Ticket};

/// 목록 본문 미리보기 최대 문자 수
const EXCERPT_MAX_CHARS: usize = 120;

/// 화면 표시용 티켓 행
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRow {
    pub id: String,
    pub title: String,
    /// 설명 미리보기 (한 줄, 잘림)
    pub excerpt: String,
    pub category_label: String,
    /// 우선순위 라벨
    pub priority_label: String,
    /// 우선순위 색상 (#RRGGBB)
    pub priority_color: String,
    /// 상태 라벨 (`in_progress` → `in progress`)
    pub status_label: String,
    /// 시간 텍스트 (상대)
    pub time_text: String,
}

/// 대시보드 카드
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: String,
    pub value: String,
    /// 강조 색상 (#RRGGBB)
    pub color: String,
}

/// Ticket → TicketRow 변환
pub fn present_ticket(ticket: &Ticket, now: DateTime<Utc>) -> TicketRow {
    TicketRow {
        id: ticket.id.to_string(),
        title: ticket.title.clone(),
        excerpt: excerpt(&ticket.description),
        category_label: ticket.category.to_string(),
        priority_label: priority_to_label(ticket.priority).to_string(),
        priority_color: priority_to_color(ticket.priority).to_string(),
        status_label: status_to_label(ticket.status),
        time_text: format_relative_time(ticket.created_at, now),
    }
}

/// 여러 티켓 일괄 변환
pub fn present_tickets(tickets: &[Ticket], now: DateTime<Utc>) -> Vec<TicketRow> {
    tickets.iter().map(|t| present_ticket(t, now)).collect()
}

/// StatsSnapshot → 대시보드 카드 4장
pub fn present_stats(snapshot: &StatsSnapshot) -> Vec<StatCard> {
    vec![
        card("전체 티켓", snapshot.total_tickets.to_string(), "#2563EB"),
        card("열림", snapshot.open_tickets.to_string(), "#D97706"),
        card(
            "일 평균",
            format!("{:.1}", snapshot.avg_tickets_per_day),
            "#059669",
        ),
        card(
            "긴급",
            snapshot.priority_count(Priority::Critical).to_string(),
            "#E11D48",
        ),
    ]
}

fn card(label: &str, value: String, color: &str) -> StatCard {
    StatCard {
        label: label.to_string(),
        value,
        color: color.to_string(),
    }
}

fn priority_to_label(p: Priority) -> &'static str {
    match p {
        Priority::Critical => "긴급",
        Priority::High => "높음",
        Priority::Medium => "보통",
        Priority::Low => "낮음",
    }
}

fn priority_to_color(p: Priority) -> &'static str {
    match p {
        Priority::Critical => "#B91C1C", // red-700
        Priority::High => "#C2410C",     // orange-700
        Priority::Medium => "#A16207",   // yellow-700
        Priority::Low => "#15803D",      // green-700
    }
}

fn status_to_label(s: Status) -> String {
    s.as_str().replace('_', " ")
}

fn excerpt(description: &str) -> String {
    let line = description
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");
    if line.chars().count() <= EXCERPT_MAX_CHARS {
        return line.to_string();
    }
    let mut cut: String = line.chars().take(EXCERPT_MAX_CHARS).collect();
    cut.push('…');
    cut
}

fn format_relative_time(dt: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now - dt;

    if diff.num_seconds() < 60 {
        "방금 전".to_string()
    } else if diff.num_minutes() < 60 {
        format!("{}분 전", diff.num_minutes())
    } else if diff.num_hours() < 24 {
        format!("{}시간 전", diff.num_hours())
    } else {
        format!("{}일 전", diff.num_days())
    }
}
