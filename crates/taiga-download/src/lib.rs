//! Download engines: segmented (HLS) stream downloads and direct
//! single-file transfers.
//!
//! Both engines report progress through typed events, support
//! cancellation, and hand terminal outcomes to a
//! [`taiga_core::notify::Notifier`] exactly once per finished job.

pub mod error;
pub mod hls;
pub mod manifest;
pub mod progress;
pub mod transfer;

pub use error::{HlsError, TransferError};
pub use hls::{HlsDownloader, HttpFetcher, SegmentFetcher};
pub use progress::{CancelHandle, DownloadEvent, DownloadState, Progress};
pub use transfer::{HttpTransport, TransferBody, TransferManager, Transport};
