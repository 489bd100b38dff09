//! 갱신 신호 코디네이터.
//!
//! 프로세스 전역 단조 증가 카운터. 변경 작업(티켓 생성, 상태 변경)이 성공하면
//! `bump()`하고, 목록/통계 뷰가 구독해 재조회한다.
//! 값 자체에는 의미가 없으며 "마지막 관측 이후 바뀌었다"만 전달한다.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// 갱신 신호 코디네이터 (복제 시 같은 카운터 공유)
#[derive(Debug, Clone)]
pub struct RefreshCoordinator {
    tx: Arc<watch::Sender<u64>>,
}

impl RefreshCoordinator {
    /// 초기값 0으로 생성
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// 카운터 증가 후 새 값 반환
    ///
    /// 구독자가 없어도 값은 증가한다.
    pub fn bump(&self) -> u64 {
        self.tx.send_modify(|value| *value += 1);
        let value = *self.tx.borrow();
        debug!("갱신 신호 발행: {value} (구독자 {})", self.tx.receiver_count());
        value
    }

    /// 현재 카운터 값
    pub fn current(&self) -> u64 {
        *self.tx.borrow()
    }

    /// 구독 등록 (현재 값은 이미 관측한 것으로 간주)
    pub fn subscribe(&self) -> RefreshSubscription {
        RefreshSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// 살아있는 구독 수
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// 갱신 신호 구독 핸들
///
/// drop 또는 `unsubscribe()` 시 구독이 해제된다.
#[derive(Debug)]
pub struct RefreshSubscription {
    rx: watch::Receiver<u64>,
}

impl RefreshSubscription {
    /// 마지막으로 본 값
    pub fn observed(&self) -> u64 {
        *self.rx.borrow()
    }

    /// 관측하지 않은 변경이 있는지
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// 다음 변경까지 대기 후 최신 값 반환
    ///
    /// 대기 중 여러 번 bump되면 한 번의 변경으로 합쳐진다.
    /// 코디네이터가 모두 drop되면 `None`.
    pub async fn changed(&mut self) -> Option<u64> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    /// 구독 해제
    pub fn unsubscribe(self) {
        debug!("갱신 신호 구독 해제 (마지막 관측값 {})", self.observed());
    }
}
