//! Segmented stream download engine.
//!
//! State machine: Idle → FetchingManifest → Downloading → Completed |
//! Failed | Cancelled. Segments are fetched strictly in playlist order,
//! never concurrently, and appended to one growing output file; playback
//! requires byte-exact concatenation. Progress and state updates flow
//! through a single unbounded channel, and the notifier fires exactly
//! once per job with the terminal outcome.

use std::future::Future;
use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::UnboundedSender;
use url::Url;

use taiga_core::notify::{Notification, Notifier};

use crate::error::HlsError;
use crate::manifest;
use crate::progress::{CancelHandle, DownloadEvent, DownloadState, Progress};

type FetchResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Fetches manifest and segment bodies. Split out so tests can run the
/// engine against canned data.
pub trait SegmentFetcher: Send + Sync {
    fn fetch_text(&self, url: &Url) -> impl Future<Output = FetchResult<String>> + Send;
    fn fetch_bytes(&self, url: &Url) -> impl Future<Output = FetchResult<Vec<u8>>> + Send;
}

/// HTTP-backed fetcher.
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn get(&self, url: &Url) -> FetchResult<Vec<u8>> {
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &Url) -> FetchResult<String> {
        let bytes = self.get(url).await?;
        Ok(String::from_utf8(bytes)?)
    }

    async fn fetch_bytes(&self, url: &Url) -> FetchResult<Vec<u8>> {
        self.get(url).await
    }
}

pub struct HlsDownloader<F, N> {
    fetcher: F,
    notifier: N,
}

impl<F: SegmentFetcher, N: Notifier> HlsDownloader<F, N> {
    pub fn new(fetcher: F, notifier: N) -> Self {
        Self { fetcher, notifier }
    }

    /// Run one download job to a terminal state.
    ///
    /// Returns the output path only on completion. A cancelled job emits
    /// a Cancelled event and no notification; any other failure emits a
    /// Failed event and exactly one `DownloadFailed` notification.
    pub async fn download(
        &self,
        key: &str,
        manifest_url: &Url,
        output: &Path,
        events: &UnboundedSender<DownloadEvent>,
        cancel: &CancelHandle,
    ) -> Result<PathBuf, HlsError> {
        let result = self.run(manifest_url, output, events, cancel).await;
        match &result {
            Ok(path) => {
                send(events, DownloadState::Completed, Progress::Fraction(1.0));
                self.notifier.notify(Notification::DownloadComplete {
                    key: key.to_string(),
                    path: path.clone(),
                });
            }
            Err(HlsError::Cancelled) => {
                send(events, DownloadState::Cancelled, Progress::Indeterminate);
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "segmented download failed");
                send(events, DownloadState::Failed, Progress::Indeterminate);
                self.notifier.notify(Notification::DownloadFailed {
                    key: key.to_string(),
                    reason: e.to_string(),
                });
            }
        }
        result
    }

    async fn run(
        &self,
        manifest_url: &Url,
        output: &Path,
        events: &UnboundedSender<DownloadEvent>,
        cancel: &CancelHandle,
    ) -> Result<PathBuf, HlsError> {
        if cancel.is_cancelled() {
            return Err(HlsError::Cancelled);
        }

        send(events, DownloadState::FetchingManifest, Progress::Indeterminate);
        let body = tokio::select! {
            body = self.fetcher.fetch_text(manifest_url) => {
                body.map_err(|e| HlsError::Manifest(e.to_string()))?
            }
            _ = cancel.cancelled() => return Err(HlsError::Cancelled),
        };
        let segments = manifest::parse_segments(&body, manifest_url)?;
        let total = segments.len() as u64;
        tracing::debug!(url = %manifest_url, segments = total, "manifest parsed");

        let mut file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(output)
            .await?;

        for (index, url) in segments.iter().enumerate() {
            let bytes = tokio::select! {
                bytes = self.fetcher.fetch_bytes(url) => {
                    bytes.map_err(|_| HlsError::Segment {
                        index,
                        url: url.to_string(),
                    })?
                }
                _ = cancel.cancelled() => return Err(HlsError::Cancelled),
            };
            file.write_all(&bytes).await?;
            send(
                events,
                DownloadState::Downloading,
                Progress::ratio(index as u64 + 1, total),
            );
        }

        file.flush().await?;
        Ok(output.to_path_buf())
    }
}

// The receiver side may already be gone; progress is best-effort.
fn send(events: &UnboundedSender<DownloadEvent>, state: DownloadState, progress: Progress) {
    let _ = events.send(DownloadEvent { state, progress });
}
