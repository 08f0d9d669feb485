//! Provider adapter contract.
//!
//! All listing backends implement [`MetadataProvider`], so the aggregator
//! and UI stay provider-agnostic. One HTTP request per operation, typed
//! decode, pure mapping into the canonical model; retry policy belongs to
//! the caller.

use std::future::Future;

use chrono::{Datelike, Local, Utc};

use taiga_core::models::{AnimeDetail, AnimeSummary, MediaId};

use crate::error::FetchError;

/// A third-party listing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    AniList,
    Jikan,
    Kitsu,
}

impl Provider {
    pub const ALL: &[Provider] = &[Self::AniList, Self::Jikan, Self::Kitsu];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AniList => "anilist",
            Self::Jikan => "jikan",
            Self::Kitsu => "kitsu",
        }
    }

    /// Parse a configured provider tag. Returns `None` for anything
    /// unrecognized; the aggregator turns that into an error instead of
    /// picking a default.
    pub fn from_config_tag(tag: &str) -> Option<Self> {
        match tag {
            "anilist" => Some(Self::AniList),
            "jikan" | "mal" => Some(Self::Jikan),
            "kitsu" => Some(Self::Kitsu),
            _ => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page window for listing fetches.
#[derive(Debug, Clone, Copy)]
pub struct PageQuery {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

/// Airing-schedule window in epoch seconds.
#[derive(Debug, Clone, Copy)]
pub struct AiringWindow {
    pub start: i64,
    pub end: i64,
}

impl AiringWindow {
    /// The next seven days: UTC now shifted by the local offset, so the
    /// window lines up with the user's wall-clock week.
    pub fn next_week() -> Self {
        let offset = i64::from(Local::now().offset().local_minus_utc());
        let now = Utc::now().timestamp() + offset;
        Self {
            start: now,
            end: now + 7 * 24 * 3600,
        }
    }
}

/// Anime season (quarter of the year).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimeSeason {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl AnimeSeason {
    pub const ALL: &[AnimeSeason] = &[Self::Winter, Self::Spring, Self::Summer, Self::Fall];

    /// AniList GraphQL `MediaSeason` enum value.
    pub fn to_anilist_str(self) -> &'static str {
        match self {
            Self::Winter => "WINTER",
            Self::Spring => "SPRING",
            Self::Summer => "SUMMER",
            Self::Fall => "FALL",
        }
    }

    /// Kitsu `filter[season]` value.
    pub fn to_kitsu_str(self) -> &'static str {
        match self {
            Self::Winter => "winter",
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall => "fall",
        }
    }

    /// Jikan season path segment.
    pub fn to_jikan_str(self) -> &'static str {
        self.to_kitsu_str()
    }

    /// Determine the current anime season from the current month.
    pub fn current() -> Self {
        let month = Utc::now().month();
        match month {
            1..=3 => Self::Winter,
            4..=6 => Self::Spring,
            7..=9 => Self::Summer,
            _ => Self::Fall,
        }
    }
}

impl std::fmt::Display for AnimeSeason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Winter => write!(f, "Winter"),
            Self::Spring => write!(f, "Spring"),
            Self::Summer => write!(f, "Summer"),
            Self::Fall => write!(f, "Fall"),
        }
    }
}

/// A unified listing-provider interface.
///
/// A record missing a required mapping field (no id) is silently dropped
/// from list results; the remaining records keep their original order. Any
/// transport failure or non-2xx status fails the whole call with
/// [`FetchError`] and no partial results.
pub trait MetadataProvider: Send + Sync {
    fn provider(&self) -> Provider;

    /// Currently-trending titles.
    fn trending(
        &self,
        page: PageQuery,
    ) -> impl Future<Output = Result<Vec<AnimeSummary>, FetchError>> + Send;

    /// Titles airing inside the window, ascending by airing time.
    fn airing(
        &self,
        window: AiringWindow,
    ) -> impl Future<Output = Result<Vec<AnimeSummary>, FetchError>> + Send;

    /// Titles of one broadcast season.
    fn seasonal(
        &self,
        season: AnimeSeason,
        year: u32,
        page: PageQuery,
    ) -> impl Future<Output = Result<Vec<AnimeSummary>, FetchError>> + Send;

    /// Full record for a single title. The id is provider-scoped.
    fn detail(
        &self,
        id: &MediaId,
    ) -> impl Future<Output = Result<AnimeDetail, FetchError>> + Send;
}
