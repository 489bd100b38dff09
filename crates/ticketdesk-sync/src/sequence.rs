//! 요청 순서 토큰.
//!
//! 컴포넌트마다 단조 증가 토큰을 발급하고, 응답 도착 시 가장 최근에 발급된
//! 토큰인지 비교한다. 늦게 도착한 이전 요청의 결과는 적용하지 않는다
//! (전송 계층 중단이 아니라 논리적 취소).

/// 단조 증가 요청 토큰 발급기
#[derive(Debug, Default)]
pub struct RequestSequence {
    issued: u64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// 새 요청 토큰 발급
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// 토큰이 가장 최근 발급분인지
    pub fn is_latest(&self, token: u64) -> bool {
        token == self.issued
    }

    /// 마지막 발급 토큰 (미발급이면 0)
    pub fn latest(&self) -> u64 {
        self.issued
    }
}

/// 조회 결과 적용 여부
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 최신 요청 결과를 적용함
    Applied,
    /// 더 새로운 요청이 발급되어 결과를 버림
    Stale,
    /// 최신 요청이 실패함 (이전 데이터 유지)
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_last_issued_is_latest() {
        let mut seq = RequestSequence::new();
        assert_eq!(seq.latest(), 0);

        let a = seq.issue();
        let b = seq.issue();
        assert!(b > a);
        assert!(!seq.is_latest(a));
        assert!(seq.is_latest(b));
    }
}
