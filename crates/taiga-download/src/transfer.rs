//! Direct single-file transfer manager.
//!
//! Keyed, concurrent downloads of plain files. The job table is the one
//! piece of shared mutable state; start, cancel, and polling all take the
//! same lock, so they observe a consistent view.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use futures::{Stream, StreamExt};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;
use url::Url;

use taiga_core::notify::{Notification, Notifier};

use crate::error::TransferError;
use crate::progress::Progress;

/// A streaming response body. `total` is the content length when the
/// server reports one.
pub struct TransferBody {
    pub total: Option<u64>,
    pub stream: Pin<Box<dyn Stream<Item = Result<Vec<u8>, TransferError>> + Send>>,
}

/// Byte-stream source for transfers. HTTP in production, canned streams
/// in tests.
pub trait Transport: Send + Sync + 'static {
    fn get(&self, url: &Url) -> impl Future<Output = Result<TransferBody, TransferError>> + Send;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<TransferBody, TransferError> {
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        let total = resp.content_length();
        let stream = resp
            .bytes_stream()
            .map(|chunk| chunk.map(|b| b.to_vec()).map_err(TransferError::Http));
        Ok(TransferBody {
            total,
            stream: Box::pin(stream),
        })
    }
}

struct Job {
    progress: Progress,
    handle: JoinHandle<()>,
}

pub struct TransferManager<T, N> {
    transport: Arc<T>,
    notifier: Arc<N>,
    downloads_dir: PathBuf,
    jobs: Arc<Mutex<HashMap<String, Job>>>,
}

impl<T: Transport, N: Notifier + 'static> TransferManager<T, N> {
    pub fn new(transport: T, notifier: N, downloads_dir: PathBuf) -> Self {
        Self {
            transport: Arc::new(transport),
            notifier: Arc::new(notifier),
            downloads_dir,
            jobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Start a keyed transfer. Returns `false` without side effects when a
    /// job under `key` is already active.
    ///
    /// The finished file lands in the downloads directory under a
    /// sanitized, collision-avoided name derived from the URL. The
    /// notifier fires exactly once per job that runs to a terminal state;
    /// a cancelled job fires nothing.
    pub fn start(&self, url: Url, key: &str) -> bool {
        let mut jobs = self.jobs.lock().unwrap();
        if jobs.contains_key(key) {
            tracing::debug!(key, "transfer already active");
            return false;
        }

        let transport = Arc::clone(&self.transport);
        let notifier = Arc::clone(&self.notifier);
        let job_table = Arc::clone(&self.jobs);
        let dir = self.downloads_dir.clone();
        let job_key = key.to_string();

        let handle = tokio::spawn(async move {
            let result = run_transfer(&*transport, &job_table, &job_key, &url, &dir).await;
            job_table.lock().unwrap().remove(&job_key);
            match result {
                Ok(path) => {
                    tracing::info!(key = job_key, path = %path.display(), "transfer complete");
                    notifier.notify(Notification::DownloadComplete { key: job_key, path });
                }
                Err(e) => {
                    tracing::warn!(key = job_key, error = %e, "transfer failed");
                    notifier.notify(Notification::DownloadFailed {
                        key: job_key,
                        reason: e.to_string(),
                    });
                }
            }
        });

        jobs.insert(
            key.to_string(),
            Job {
                progress: Progress::Fraction(0.0),
                handle,
            },
        );
        true
    }

    /// Abort a transfer and forget it immediately. No notification is
    /// fired and the partial file is left behind.
    pub fn cancel(&self, key: &str) -> bool {
        match self.jobs.lock().unwrap().remove(key) {
            Some(job) => {
                job.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Point-in-time snapshot of active jobs and their progress.
    pub fn active(&self) -> HashMap<String, Progress> {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .map(|(key, job)| (key.clone(), job.progress))
            .collect()
    }
}

async fn run_transfer<T: Transport>(
    transport: &T,
    jobs: &Mutex<HashMap<String, Job>>,
    key: &str,
    url: &Url,
    dir: &Path,
) -> Result<PathBuf, TransferError> {
    let mut body = transport.get(url).await?;
    let part_path = dir.join(format!("{}.part", sanitize_filename(key)));
    let mut file = fs::File::create(&part_path).await?;

    let mut received: u64 = 0;
    while let Some(chunk) = body.stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        received += chunk.len() as u64;
        let progress = match body.total {
            Some(total) if total > 0 => Progress::ratio(received, total),
            _ => Progress::Indeterminate,
        };
        if let Some(job) = jobs.lock().unwrap().get_mut(key) {
            job.progress = progress;
        }
    }
    file.flush().await?;
    drop(file);

    let name = sanitize_filename(file_name_from_url(url));
    let dest = reserve_destination(dir, &name).await?;
    fs::rename(&part_path, &dest).await?;
    Ok(dest)
}

fn file_name_from_url(url: &Url) -> &str {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .unwrap_or("download")
}

/// Replace characters that are invalid in file names.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned.trim_matches(['_', '.', ' ']).is_empty() {
        "download".to_string()
    } else {
        cleaned
    }
}

/// Claim the first free path for `name` in `dir`: `name`, then `name-2`,
/// `name-3`, keeping the extension in place.
///
/// The claim is a `create_new` placeholder, so two jobs finishing with the
/// same name at the same time cannot both pick one path; the loser moves
/// on to the next suffix. The caller renames its finished file over the
/// placeholder.
async fn reserve_destination(dir: &Path, name: &str) -> Result<PathBuf, TransferError> {
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };

    let mut n = 1u32;
    loop {
        let candidate = if n == 1 {
            dir.join(name)
        } else {
            match ext {
                Some(ext) => dir.join(format!("{stem}-{n}.{ext}")),
                None => dir.join(format!("{stem}-{n}")),
            }
        };
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e.into()),
        }
    }
}
