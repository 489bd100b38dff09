//! Ticketdesk 핵심 에러 타입.
//!
//! 어댑터와 동기화 레이어 모두 `CoreError`를 그대로 반환한다.
//! 호출자는 전송 실패(`Transport`)와 서버 에러(`Server`)를 구분할 수 있어야 한다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 응답 없음 (연결 실패, 타임아웃)
    #[error("전송 에러: {0}")]
    Transport(String),

    /// 서버가 2xx 이외의 상태 코드로 응답
    #[error("서버 에러 ({status}): {message}")]
    Server {
        /// HTTP 상태 코드
        status: u16,
        /// 응답 본문 또는 사유
        message: String,
    },

    /// 클라이언트 측 유효성 검증 실패 (전송 전)
    #[error("유효성 검증 실패 ({field}): {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 분류 제안 실패 (항상 비치명적)
    #[error("분류 제안 실패: {0}")]
    Advisory(String),

    /// 2xx 응답이지만 본문을 해석할 수 없음 (알 수 없는 enum 값 포함)
    #[error("잘못된 응답: {0}")]
    MalformedResponse(String),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// 필드 검증 에러 생성 헬퍼
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        CoreError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// 전송 계층 실패인지
    pub fn is_transport(&self) -> bool {
        matches!(self, CoreError::Transport(_))
    }

    /// 서버 에러 응답인지
    pub fn is_server(&self) -> bool {
        matches!(self, CoreError::Server { .. })
    }

    /// 클라이언트 측 검증 실패인지
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_are_distinguishable() {
        let transport = CoreError::Transport("timeout".to_string());
        let server = CoreError::Server {
            status: 500,
            message: "boom".to_string(),
        };
        let validation = CoreError::validation("title", "제목이 비어 있습니다");

        assert!(transport.is_transport() && !transport.is_server());
        assert!(server.is_server() && !server.is_transport());
        assert!(validation.is_validation());
    }

    #[test]
    fn server_error_display_includes_status() {
        let err = CoreError::Server {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(format!("{err}"), "서버 에러 (503): unavailable");
    }
}
