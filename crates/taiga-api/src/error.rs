use thiserror::Error;

use crate::traits::Provider;

/// Transport or decode failure from one provider adapter.
///
/// The whole operation fails; adapters never return partial results and
/// never retry internally.
#[derive(Debug, Error)]
#[error("{provider} fetch failed: {cause}")]
pub struct FetchError {
    pub provider: Provider,
    #[source]
    pub cause: FetchCause,
}

impl FetchError {
    pub fn new(provider: Provider, cause: impl Into<FetchCause>) -> Self {
        Self {
            provider,
            cause: cause.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchCause {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Aggregator-level failures.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// Configuration points at a provider with no registered adapter.
    /// Fatal to the call, never silently defaulted around.
    #[error("unknown provider: {0:?}")]
    UnknownProvider(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Token-exchange and credential failures, tagged by stage. No partial
/// token is ever persisted when any stage fails.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("network error during token exchange: {0}")]
    Network(#[from] reqwest::Error),

    #[error("token endpoint returned status {status}: {message}")]
    Endpoint { status: u16, message: String },

    #[error("token response decode failed: {0}")]
    Decode(String),

    #[error("token response missing field: {0}")]
    MissingField(&'static str),

    #[error("credential store write failed: {0}")]
    StoreWrite(String),

    /// Authenticated operation attempted with no stored token. Raised
    /// before any network call is made.
    #[error("no stored credential for {0}")]
    MissingCredential(Provider),

    #[error("{0} does not support authentication")]
    Unsupported(Provider),
}
