//! Progress reporting and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Job progress. When the total size is unknown there is no fraction to
/// report, so the state is the explicit [`Progress::Indeterminate`]
/// variant rather than a placeholder number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Progress {
    Indeterminate,
    /// Completed fraction in `0.0..=1.0`.
    Fraction(f32),
}

impl Progress {
    /// Coarse completed-over-total fraction.
    pub fn ratio(completed: u64, total: u64) -> Self {
        if total == 0 {
            Self::Indeterminate
        } else {
            Self::Fraction(completed as f32 / total as f32)
        }
    }
}

/// Download job lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadState {
    Idle,
    FetchingManifest,
    Downloading,
    Completed,
    Failed,
    Cancelled,
}

/// One progress/state update, delivered over the job's event channel.
#[derive(Debug, Clone)]
pub struct DownloadEvent {
    pub state: DownloadState,
    pub progress: Progress,
}

#[derive(Debug, Default)]
struct CancelInner {
    flag: AtomicBool,
    notify: Notify,
}

/// Cooperative cancellation flag shared between a download job and its
/// owner. Cloning hands out another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    inner: Arc<CancelInner>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.inner.flag.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.flag.load(Ordering::SeqCst)
    }

    /// Resolves once cancellation has been requested.
    pub async fn cancelled(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent cancel() is
        // never missed.
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}
