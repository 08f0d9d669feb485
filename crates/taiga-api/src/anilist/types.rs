use serde::Deserialize;

use taiga_core::models::{AiredDate, AnimeDetail, AnimeSummary, AnimeTitle, MediaId};

// ── GraphQL response envelopes ───────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct PageResponse {
    #[serde(rename = "Page")]
    pub page: MediaPage,
}

#[derive(Debug, Deserialize)]
pub struct MediaPage {
    #[serde(default)]
    pub media: Vec<AniListMedia>,
}

#[derive(Debug, Deserialize)]
pub struct AiringPageResponse {
    #[serde(rename = "Page")]
    pub page: SchedulePage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePage {
    #[serde(default)]
    pub airing_schedules: Vec<AiringSchedule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiringSchedule {
    pub airing_at: Option<i64>,
    pub media: Option<AniListMedia>,
}

#[derive(Debug, Deserialize)]
pub struct MediaResponse {
    #[serde(rename = "Media")]
    pub media: Option<AniListMedia>,
}

#[derive(Debug, Deserialize)]
pub struct ViewerResponse {
    #[serde(rename = "Viewer")]
    pub viewer: Viewer,
}

/// Authenticated user profile.
#[derive(Debug, Clone, Deserialize)]
pub struct Viewer {
    pub id: u64,
    pub name: String,
}

// ── Media types ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AniListMedia {
    pub id: Option<u64>,
    pub title: Option<MediaTitle>,
    pub cover_image: Option<CoverImage>,
    pub episodes: Option<u32>,
    pub description: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub mean_score: Option<f32>,
    pub status: Option<String>,
    pub format: Option<String>,
    pub start_date: Option<FuzzyDate>,
    pub end_date: Option<FuzzyDate>,
    pub next_airing_episode: Option<NextAiringEpisode>,
}

#[derive(Debug, Deserialize)]
pub struct MediaTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CoverImage {
    pub large: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextAiringEpisode {
    pub airing_at: Option<i64>,
}

/// AniList fuzzy date: any component may be null.
#[derive(Debug, Deserialize)]
pub struct FuzzyDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl FuzzyDate {
    /// A full calendar date, or `None` when any component is missing.
    pub fn into_aired(self) -> Option<AiredDate> {
        Some(AiredDate {
            year: self.year?,
            month: self.month?,
            day: self.day?,
        })
    }
}

// ── Conversions ──────────────────────────────────────────────────

impl AniListMedia {
    /// `None` when the record carries no id; the caller drops it.
    pub fn into_summary(self) -> Option<AnimeSummary> {
        let id = self.id?;
        let title = match self.title {
            Some(t) => AnimeTitle::from_parts(t.romaji, t.english, t.native),
            None => AnimeTitle::from_parts(None, None, None),
        };
        Some(AnimeSummary {
            id: MediaId::Numeric(id),
            title,
            cover_url: self.cover_image.and_then(|c| c.large),
            episodes: self.episodes,
            synopsis: self.description,
            next_airing_at: self.next_airing_episode.and_then(|n| n.airing_at),
        })
    }

    pub fn into_detail(mut self) -> Option<AnimeDetail> {
        let genres = std::mem::take(&mut self.genres);
        // AniList scores are 0-100; the canonical scale is 0-10.
        let mean_score = self.mean_score.take().map(|s| s / 10.0);
        let status = self.status.take();
        let format = self.format.take();
        let start_date = self.start_date.take().and_then(FuzzyDate::into_aired);
        let end_date = self.end_date.take().and_then(FuzzyDate::into_aired);
        Some(AnimeDetail {
            summary: self.into_summary()?,
            genres,
            mean_score,
            status,
            format,
            start_date,
            end_date,
        })
    }
}
