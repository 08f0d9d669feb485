use reqwest::Client;

use taiga_core::models::{AnimeDetail, AnimeSummary, MediaId};

use super::types::{resource_into_summary, JsonApiListResponse, JsonApiSingleResponse, KitsuAnimeAttributes};
use crate::error::{FetchCause, FetchError};
use crate::traits::{AiringWindow, AnimeSeason, MetadataProvider, PageQuery, Provider};

const BASE_URL: &str = "https://kitsu.io/api/edge";

const ANIME_FIELDS: &str = "canonicalTitle,titles,episodeCount,posterImage,averageRating,\
                            synopsis,subtype,status,startDate,endDate";

/// Kitsu JSON:API adapter.
pub struct KitsuClient {
    http: Client,
}

impl KitsuClient {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, FetchCause> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "Kitsu API error");
            Err(FetchCause::Api {
                status,
                message: body,
            })
        }
    }

    fn err(cause: FetchCause) -> FetchError {
        FetchError::new(Provider::Kitsu, cause)
    }

    async fn get_list(
        &self,
        url: String,
        query: &[(&str, String)],
    ) -> Result<Vec<AnimeSummary>, FetchError> {
        tracing::debug!(%url, "Kitsu request");
        let resp = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.api+json")
            .query(query)
            .send()
            .await
            .map_err(|e| Self::err(e.into()))?;

        let resp = Self::check_response(resp).await.map_err(Self::err)?;
        let page: JsonApiListResponse = resp
            .json()
            .await
            .map_err(|e| Self::err(FetchCause::Parse(e.to_string())))?;

        Ok(page
            .data
            .into_iter()
            .filter_map(resource_into_summary)
            .collect())
    }
}

impl MetadataProvider for KitsuClient {
    fn provider(&self) -> Provider {
        Provider::Kitsu
    }

    async fn trending(&self, page: PageQuery) -> Result<Vec<AnimeSummary>, FetchError> {
        self.get_list(
            format!("{BASE_URL}/trending/anime"),
            &[
                ("limit", page.per_page.to_string()),
                ("fields[anime]", ANIME_FIELDS.to_string()),
            ],
        )
        .await
    }

    async fn airing(&self, _window: AiringWindow) -> Result<Vec<AnimeSummary>, FetchError> {
        // Kitsu has no schedule endpoint; currently-airing titles by
        // popularity stand in for the weekly window.
        self.get_list(
            format!("{BASE_URL}/anime"),
            &[
                ("filter[status]", "current".to_string()),
                ("sort", "-user_count".to_string()),
                ("page[limit]", "20".to_string()),
                ("fields[anime]", ANIME_FIELDS.to_string()),
            ],
        )
        .await
    }

    async fn seasonal(
        &self,
        season: AnimeSeason,
        year: u32,
        page: PageQuery,
    ) -> Result<Vec<AnimeSummary>, FetchError> {
        let offset = page.page.saturating_sub(1) * page.per_page;
        self.get_list(
            format!("{BASE_URL}/anime"),
            &[
                ("filter[season]", season.to_kitsu_str().to_string()),
                ("filter[seasonYear]", year.to_string()),
                ("sort", "-user_count".to_string()),
                ("page[limit]", page.per_page.to_string()),
                ("page[offset]", offset.to_string()),
                ("fields[anime]", ANIME_FIELDS.to_string()),
            ],
        )
        .await
    }

    async fn detail(&self, id: &MediaId) -> Result<AnimeDetail, FetchError> {
        let url = format!("{BASE_URL}/anime/{id}");
        tracing::debug!(%url, "Kitsu request");
        let resp = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.api+json")
            .query(&[("fields[anime]", ANIME_FIELDS)])
            .send()
            .await
            .map_err(|e| Self::err(e.into()))?;

        let resp = Self::check_response(resp).await.map_err(Self::err)?;
        let body: JsonApiSingleResponse = resp
            .json()
            .await
            .map_err(|e| Self::err(FetchCause::Parse(e.to_string())))?;

        let numeric = body
            .data
            .id
            .parse::<u64>()
            .map_err(|_| Self::err(FetchCause::Parse("invalid anime id in response".into())))?;
        let attrs: KitsuAnimeAttributes = serde_json::from_value(body.data.attributes)
            .map_err(|e| Self::err(FetchCause::Parse(e.to_string())))?;

        Ok(attrs.into_detail(numeric))
    }
}
