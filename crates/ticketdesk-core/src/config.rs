//! 애플리케이션 설정 구조체.
//!
//! 서버 URL, 요청 타임아웃, 분류 제안 임계값, 동기화 동작 등
//! 런타임 설정을 정의한다. `ConfigManager`를 통해 JSON 파일에서 로드.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 서버 연결 설정
    pub server: ServerConfig,
    /// 분류 제안 설정
    #[serde(default)]
    pub advisor: AdvisorConfig,
    /// 목록/통계 동기화 설정
    #[serde(default)]
    pub sync: SyncConfig,
}

/// 서버 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// API 기본 URL (예: "http://localhost:8000/api")
    pub base_url: String,
    /// 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// 분류 제안 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// 분류 요청을 보낼 최소 설명 길이 (trim 후 문자 수)
    #[serde(default = "default_min_description_chars")]
    pub min_description_chars: usize,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            min_description_chars: default_min_description_chars(),
        }
    }
}

/// 동기화 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// 구독 시작 직후 한 번 조회할지 (화면 마운트 시 최초 로드)
    #[serde(default = "default_true")]
    pub run_initial_fetch: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            run_initial_fetch: true,
        }
    }
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_min_description_chars() -> usize {
    10
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                base_url: "http://localhost:8000/api".to_string(),
                request_timeout_ms: default_request_timeout_ms(),
            },
            advisor: AdvisorConfig::default(),
            sync: SyncConfig::default(),
        }
    }

    /// 요청 타임아웃
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }

    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        let parsed = url::Url::parse(&self.server.base_url)
            .map_err(|e| CoreError::Config(format!("server.base_url 파싱 실패: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CoreError::Config(format!(
                "server.base_url 스킴은 http/https여야 합니다: {}",
                parsed.scheme()
            )));
        }
        if self.server.request_timeout_ms == 0 {
            return Err(CoreError::Config(
                "server.request_timeout_ms는 0보다 커야 합니다".to_string(),
            ));
        }
        if self.advisor.min_description_chars == 0 {
            return Err(CoreError::Config(
                "advisor.min_description_chars는 0보다 커야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"server":{"base_url":"http://tickets.local/api"}}"#).unwrap();
        assert_eq!(config.server.request_timeout_ms, 30_000);
        assert_eq!(config.advisor.min_description_chars, 10);
        assert!(config.sync.run_initial_fetch);
    }

    #[test]
    fn invalid_base_url_rejected() {
        let mut config = AppConfig::default_config();
        config.server.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        config.server.base_url = "ftp://tickets.local".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = AppConfig::default_config();
        config.server.request_timeout_ms = 0;
        assert!(config.validate().is_err());
    }
}
