//! 라이프사이클 관리.
//!
//! 종료 신호 전파, OS 시그널 대기.

use tokio::sync::watch;
use tracing::{info, warn};

/// 라이프사이클 관리자
pub struct LifecycleManager {
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl LifecycleManager {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            shutdown_tx: tx,
            shutdown_rx: rx,
        }
    }

    /// 종료 수신기 복제 (동기화 루프마다 하나씩)
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// 종료 신호 발송
    pub fn shutdown(&self) {
        info!("종료 신호 발송");
        let _ = self.shutdown_tx.send(true);
    }

    /// OS 시그널 대기 (SIGINT, SIGTERM) 후 종료 신호 발송
    ///
    /// 핸들러 등록에 실패하면 바로 종료 신호를 보낸다.
    pub async fn wait_for_signal(&self) {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match (
                signal(SignalKind::interrupt()),
                signal(SignalKind::terminate()),
            ) {
                (Ok(mut sigint), Ok(mut sigterm)) => {
                    tokio::select! {
                        _ = sigint.recv() => info!("SIGINT 수신"),
                        _ = sigterm.recv() => info!("SIGTERM 수신"),
                    }
                }
                (Err(e), _) | (_, Err(e)) => warn!("시그널 핸들러 등록 실패: {e}"),
            }
        }

        #[cfg(not(unix))]
        {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Ctrl+C 수신"),
                Err(e) => warn!("Ctrl+C 핸들러 등록 실패: {e}"),
            }
        }

        self.shutdown();
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_running() {
        let lm = LifecycleManager::new();
        let rx = lm.subscribe();
        assert!(!*rx.borrow());
    }

    #[tokio::test]
    async fn shutdown_reaches_every_subscriber() {
        let lm = LifecycleManager::new();
        let mut a = lm.subscribe();
        let b = lm.subscribe();

        lm.shutdown();

        a.changed().await.unwrap();
        assert!(*a.borrow());
        assert!(*b.borrow());
    }
}
