//! Listing aggregator.
//!
//! Dispatches listing and detail fetches to the adapter for the
//! currently-selected provider. The selection is re-read from the config
//! store on every call, so a mid-session provider switch takes effect
//! immediately. There is no cross-provider fallback or merging; the
//! selected adapter's failure surfaces directly.

use std::future::Future;

use taiga_core::config::ConfigStore;
use taiga_core::models::{AnimeDetail, AnimeSummary, MediaId};

use crate::anilist::AniListClient;
use crate::error::{AggregateError, FetchError};
use crate::jikan::JikanClient;
use crate::kitsu::KitsuClient;
use crate::traits::{AiringWindow, AnimeSeason, MetadataProvider, PageQuery, Provider};

/// One listing fetch.
#[derive(Debug, Clone, Copy)]
pub enum ListingRequest {
    Trending(PageQuery),
    Airing(AiringWindow),
    Seasonal {
        season: AnimeSeason,
        year: u32,
        page: PageQuery,
    },
}

/// Retry budget applied at the aggregator boundary. Adapters themselves
/// never retry.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryPolicy {
    pub max_retries: u32,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Read the budget from the configured `max_retries` setting.
    pub fn from_config<C: ConfigStore>(config: &C) -> Self {
        Self::new(config.max_retries())
    }
}

pub struct Aggregator<C> {
    config: C,
    retry: RetryPolicy,
    anilist: AniListClient,
    jikan: JikanClient,
    kitsu: KitsuClient,
}

impl<C: ConfigStore> Aggregator<C> {
    pub fn new(config: C, retry: RetryPolicy) -> Self {
        Self::with_clients(
            config,
            retry,
            AniListClient::new(),
            JikanClient::new(),
            KitsuClient::new(),
        )
    }

    /// Construct with pre-configured adapter clients, e.g. to set custom
    /// HTTP timeouts.
    pub fn with_clients(
        config: C,
        retry: RetryPolicy,
        anilist: AniListClient,
        jikan: JikanClient,
        kitsu: KitsuClient,
    ) -> Self {
        Self {
            config,
            retry,
            anilist,
            jikan,
            kitsu,
        }
    }

    /// Resolve the configured provider tag. An unset or unrecognized tag
    /// fails the call; there is no silent default.
    fn active_provider(&self) -> Result<Provider, AggregateError> {
        let tag = self.config.selected_provider().unwrap_or_default();
        Provider::from_config_tag(&tag).ok_or(AggregateError::UnknownProvider(tag))
    }

    async fn with_retry<F, Fut, T>(&self, mut attempt: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut tries = 0;
        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(e) if tries < self.retry.max_retries => {
                    tries += 1;
                    tracing::warn!(error = %e, tries, "listing fetch failed, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn dispatch<P: MetadataProvider>(
        &self,
        adapter: &P,
        request: ListingRequest,
    ) -> Result<Vec<AnimeSummary>, FetchError> {
        self.with_retry(|| async move {
            match request {
                ListingRequest::Trending(page) => adapter.trending(page).await,
                ListingRequest::Airing(window) => adapter.airing(window).await,
                ListingRequest::Seasonal { season, year, page } => {
                    adapter.seasonal(season, year, page).await
                }
            }
        })
        .await
    }

    /// Fetch one listing from the currently-selected provider.
    pub async fn fetch(
        &self,
        request: ListingRequest,
    ) -> Result<Vec<AnimeSummary>, AggregateError> {
        let results = match self.active_provider()? {
            Provider::AniList => self.dispatch(&self.anilist, request).await?,
            Provider::Jikan => self.dispatch(&self.jikan, request).await?,
            Provider::Kitsu => self.dispatch(&self.kitsu, request).await?,
        };
        Ok(results)
    }

    /// Fetch the full record for one title from the currently-selected
    /// provider. The id must come from that same provider.
    pub async fn detail(&self, id: &MediaId) -> Result<AnimeDetail, AggregateError> {
        let detail = match self.active_provider()? {
            Provider::AniList => self.with_retry(|| self.anilist.detail(id)).await?,
            Provider::Jikan => self.with_retry(|| self.jikan.detail(id)).await?,
            Provider::Kitsu => self.with_retry(|| self.kitsu.detail(id)).await?,
        };
        Ok(detail)
    }
}
