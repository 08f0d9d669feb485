//! Notification seam.
//!
//! Local-notification scheduling is an OS collaborator; the core only emits
//! these events. Download engines fire exactly one terminal event per job,
//! and the token broker emits an expiry reminder when a provider reports a
//! token lifetime.

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Notification {
    DownloadComplete { key: String, path: PathBuf },
    DownloadFailed { key: String, reason: String },
    TokenExpiry { service: String, expires_in: Duration },
}

pub trait Notifier: Send + Sync {
    fn notify(&self, event: Notification);
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, event: Notification) {
        (**self).notify(event);
    }
}

/// Default notifier: records events in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Notification) {
        match event {
            Notification::DownloadComplete { key, path } => {
                tracing::info!(key, path = %path.display(), "download complete");
            }
            Notification::DownloadFailed { key, reason } => {
                tracing::warn!(key, reason, "download failed");
            }
            Notification::TokenExpiry {
                service,
                expires_in,
            } => {
                tracing::info!(service, expires_in_secs = expires_in.as_secs(), "token expiry reminder scheduled");
            }
        }
    }
}
