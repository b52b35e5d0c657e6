//! Connectivity monitor: polls the answer service health endpoint and
//! publishes a shared ready/not-ready state.
//!
//! The backend is assumed to be a colocated process that becomes ready
//! quickly (it loads the model on startup), so retries use a fixed delay
//! rather than exponential backoff, and never give up.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::backend::AnswerBackend;

/// Default probe interval and retry delay.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Whether the answer service is reachable and ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityState {
    /// No probe has completed yet.
    #[default]
    Unknown,
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectivityState::Unknown => "unknown",
            ConnectivityState::Connected => "connected",
            ConnectivityState::Disconnected => "disconnected",
        };
        f.write_str(s)
    }
}

/// Run one health probe and map the result to a state. Any transport error
/// or non-success status counts as disconnected.
pub async fn probe<B: AnswerBackend + ?Sized>(backend: &B) -> ConnectivityState {
    match backend.health().await {
        Ok(()) => ConnectivityState::Connected,
        Err(e) => {
            log::debug!("connectivity: health probe failed: {}", e);
            ConnectivityState::Disconnected
        }
    }
}

/// Spawn the polling loop: probe immediately, then every `interval`, forever.
/// Returns the receiver the controller gates submissions on. The task exits
/// when every receiver has been dropped.
pub fn spawn_monitor<B: AnswerBackend + 'static>(
    backend: Arc<B>,
    interval: Duration,
) -> watch::Receiver<ConnectivityState> {
    let (tx, rx) = watch::channel(ConnectivityState::Unknown);
    tokio::spawn(async move {
        loop {
            let next = probe(backend.as_ref()).await;
            let prev = *tx.borrow();
            if prev != next {
                match next {
                    ConnectivityState::Connected => log::info!("connectivity: backend ready"),
                    _ => log::info!("connectivity: backend not ready, retrying"),
                }
            }
            if tx.send(next).is_err() {
                return;
            }
            tokio::time::sleep(interval).await;
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FlagBackend {
        healthy: AtomicBool,
    }

    #[async_trait]
    impl AnswerBackend for FlagBackend {
        async fn health(&self) -> Result<(), BackendError> {
            if self.healthy.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(BackendError::Api("503 model not loaded".to_string()))
            }
        }

        async fn answer(&self, _question: &str) -> Result<String, BackendError> {
            Err(BackendError::Api("not under test".to_string()))
        }
    }

    #[tokio::test]
    async fn probe_maps_health_result_to_state() {
        let backend = FlagBackend {
            healthy: AtomicBool::new(false),
        };
        assert_eq!(probe(&backend).await, ConnectivityState::Disconnected);
        backend.healthy.store(true, Ordering::SeqCst);
        assert_eq!(probe(&backend).await, ConnectivityState::Connected);
    }

    #[tokio::test]
    async fn monitor_recovers_after_backend_comes_up() {
        let backend = Arc::new(FlagBackend {
            healthy: AtomicBool::new(false),
        });
        let mut rx = spawn_monitor(backend.clone(), Duration::from_millis(10));

        rx.changed().await.expect("first probe");
        assert_eq!(*rx.borrow(), ConnectivityState::Disconnected);

        backend.healthy.store(true, Ordering::SeqCst);
        for _ in 0..100 {
            rx.changed().await.expect("monitor alive");
            if *rx.borrow() == ConnectivityState::Connected {
                return;
            }
        }
        panic!("monitor never reported connected");
    }
}
