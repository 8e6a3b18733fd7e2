//! Time source for synthesized metadata and copy polling.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;

/// Clock service used by the store.
///
/// `now` stamps synthesized directory entries (never persisted). `sleep` is
/// the wait between two copy-status checks; tests substitute a clock that
/// returns immediately.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> SystemTime;

    /// Suspend the calling task for `duration`.
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// The system clock, sleeping on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

#[async_trait]
impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> SystemTime {
        (**self).now()
    }

    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}
