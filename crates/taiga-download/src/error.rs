use thiserror::Error;

/// Segmented-stream download failures. Any variant ends the job as
/// Failed (or Cancelled); a partial output file is never reported as a
/// completed download.
#[derive(Debug, Error)]
pub enum HlsError {
    /// The manifest body was not decodable text or referenced no segments.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// One segment fetch failed; the whole job aborts.
    #[error("segment {index} failed: {url}")]
    Segment { index: usize, url: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("download cancelled")]
    Cancelled,
}

/// Direct single-file transfer failures. Cancellation is not an error
/// here: a cancelled transfer job is aborted and forgotten.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
