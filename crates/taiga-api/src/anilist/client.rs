use reqwest::Client;

use taiga_core::models::{AnimeDetail, AnimeSummary, MediaId};

use super::types::{
    AiringPageResponse, AniListMedia, GraphQLResponse, MediaResponse, PageResponse, Viewer,
    ViewerResponse,
};
use crate::broker::attach_auth;
use crate::error::{FetchCause, FetchError};
use crate::traits::{AiringWindow, AnimeSeason, MetadataProvider, PageQuery, Provider};

const API_URL: &str = "https://graphql.anilist.co";

const TRENDING_QUERY: &str = r#"
query ($page: Int, $perPage: Int) {
    Page(page: $page, perPage: $perPage) {
        media(sort: TRENDING_DESC, type: ANIME) {
            id
            title { romaji english native }
            coverImage { large }
            episodes
            description
            nextAiringEpisode { airingAt }
        }
    }
}
"#;

const AIRING_QUERY: &str = r#"
query ($start: Int, $end: Int, $perPage: Int) {
    Page(perPage: $perPage) {
        airingSchedules(airingAt_greater: $start, airingAt_lesser: $end, sort: TIME) {
            airingAt
            media {
                id
                title { romaji english native }
                coverImage { large }
                episodes
                description
            }
        }
    }
}
"#;

const SEASONAL_QUERY: &str = r#"
query ($season: MediaSeason, $seasonYear: Int, $page: Int, $perPage: Int) {
    Page(page: $page, perPage: $perPage) {
        media(season: $season, seasonYear: $seasonYear, type: ANIME, sort: POPULARITY_DESC) {
            id
            title { romaji english native }
            coverImage { large }
            episodes
            description
            nextAiringEpisode { airingAt }
        }
    }
}
"#;

const DETAIL_QUERY: &str = r#"
query ($id: Int) {
    Media(id: $id, type: ANIME) {
        id
        title { romaji english native }
        coverImage { large }
        episodes
        description
        genres
        meanScore
        status
        format
        startDate { year month day }
        endDate { year month day }
        nextAiringEpisode { airingAt }
    }
}
"#;

const VIEWER_QUERY: &str = r#"
query {
    Viewer {
        id
        name
    }
}
"#;

const PROGRESS_MUTATION: &str = r#"
mutation ($mediaId: Int, $progress: Int) {
    SaveMediaListEntry(mediaId: $mediaId, progress: $progress) {
        id
        progress
    }
}
"#;

/// AniList GraphQL adapter.
pub struct AniListClient {
    http: Client,
}

impl AniListClient {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    async fn graphql<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
        token: Option<&str>,
    ) -> Result<T, FetchCause> {
        tracing::debug!(operation, "AniList GraphQL request");

        let mut req = self
            .http
            .post(API_URL)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "query": query,
                "variables": variables,
            }));
        if let Some(token) = token {
            req = attach_auth(req, token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let status = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(operation, status, "AniList API error");
            return Err(FetchCause::Api {
                status,
                message: body,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| FetchCause::Parse(e.to_string()))
    }

    fn err(cause: FetchCause) -> FetchError {
        FetchError::new(Provider::AniList, cause)
    }

    /// Authenticated viewer profile. The token comes from the broker.
    pub async fn viewer(&self, token: &str) -> Result<Viewer, FetchError> {
        let resp: GraphQLResponse<ViewerResponse> = self
            .graphql("Viewer", VIEWER_QUERY, serde_json::json!({}), Some(token))
            .await
            .map_err(Self::err)?;
        Ok(resp.data.viewer)
    }

    /// Authenticated progress sync: record `progress` watched episodes.
    pub async fn update_progress(
        &self,
        token: &str,
        media_id: u64,
        progress: u32,
    ) -> Result<(), FetchError> {
        let _: GraphQLResponse<serde_json::Value> = self
            .graphql(
                "UpdateProgress",
                PROGRESS_MUTATION,
                serde_json::json!({ "mediaId": media_id, "progress": progress }),
                Some(token),
            )
            .await
            .map_err(Self::err)?;
        Ok(())
    }
}

impl MetadataProvider for AniListClient {
    fn provider(&self) -> Provider {
        Provider::AniList
    }

    async fn trending(&self, page: PageQuery) -> Result<Vec<AnimeSummary>, FetchError> {
        let resp: GraphQLResponse<PageResponse> = self
            .graphql(
                "Trending",
                TRENDING_QUERY,
                serde_json::json!({ "page": page.page, "perPage": page.per_page }),
                None,
            )
            .await
            .map_err(Self::err)?;

        Ok(resp
            .data
            .page
            .media
            .into_iter()
            .filter_map(AniListMedia::into_summary)
            .collect())
    }

    async fn airing(&self, window: AiringWindow) -> Result<Vec<AnimeSummary>, FetchError> {
        let resp: GraphQLResponse<AiringPageResponse> = self
            .graphql(
                "Airing",
                AIRING_QUERY,
                serde_json::json!({ "start": window.start, "end": window.end, "perPage": 50 }),
                None,
            )
            .await
            .map_err(Self::err)?;

        // sort: TIME keeps these ascending by airing time
        Ok(resp
            .data
            .page
            .airing_schedules
            .into_iter()
            .filter_map(|schedule| {
                let mut summary = schedule.media?.into_summary()?;
                summary.next_airing_at = schedule.airing_at.or(summary.next_airing_at);
                Some(summary)
            })
            .collect())
    }

    async fn seasonal(
        &self,
        season: AnimeSeason,
        year: u32,
        page: PageQuery,
    ) -> Result<Vec<AnimeSummary>, FetchError> {
        let resp: GraphQLResponse<PageResponse> = self
            .graphql(
                "Seasonal",
                SEASONAL_QUERY,
                serde_json::json!({
                    "season": season.to_anilist_str(),
                    "seasonYear": year,
                    "page": page.page,
                    "perPage": page.per_page,
                }),
                None,
            )
            .await
            .map_err(Self::err)?;

        Ok(resp
            .data
            .page
            .media
            .into_iter()
            .filter_map(AniListMedia::into_summary)
            .collect())
    }

    async fn detail(&self, id: &MediaId) -> Result<AnimeDetail, FetchError> {
        let numeric = match id {
            MediaId::Numeric(n) => *n,
            MediaId::Text(s) => s.parse().map_err(|_| {
                Self::err(FetchCause::Parse(format!("non-numeric AniList id: {s}")))
            })?,
        };

        let resp: GraphQLResponse<MediaResponse> = self
            .graphql(
                "Detail",
                DETAIL_QUERY,
                serde_json::json!({ "id": numeric }),
                None,
            )
            .await
            .map_err(Self::err)?;

        resp.data
            .media
            .and_then(AniListMedia::into_detail)
            .ok_or_else(|| Self::err(FetchCause::Parse("media missing from response".into())))
    }
}
