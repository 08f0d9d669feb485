use chrono::Datelike;
use reqwest::Client;

use taiga_core::models::{AnimeDetail, AnimeSummary, MediaId};

use super::types::{JikanAnime, JikanDetailResponse, JikanListResponse};
use crate::error::{FetchCause, FetchError};
use crate::traits::{AiringWindow, AnimeSeason, MetadataProvider, PageQuery, Provider};

const BASE_URL: &str = "https://api.jikan.moe/v4";

/// Jikan (unofficial MyAnimeList) REST adapter. No authentication.
pub struct JikanClient {
    http: Client,
}

impl JikanClient {
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
            tracing::warn!(status, "Jikan API error");
            Err(FetchCause::Api {
                status,
                message: body,
            })
        }
    }

    fn err(cause: FetchCause) -> FetchError {
        FetchError::new(Provider::Jikan, cause)
    }

    async fn get_list(&self, url: String, query: &[(&str, String)]) -> Result<Vec<AnimeSummary>, FetchError> {
        tracing::debug!(%url, "Jikan request");
        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| Self::err(e.into()))?;

        let resp = Self::check_response(resp).await.map_err(Self::err)?;
        let page: JikanListResponse = resp
            .json()
            .await
            .map_err(|e| Self::err(FetchCause::Parse(e.to_string())))?;

        Ok(page
            .data
            .into_iter()
            .filter_map(JikanAnime::into_summary)
            .collect())
    }
}

impl MetadataProvider for JikanClient {
    fn provider(&self) -> Provider {
        Provider::Jikan
    }

    async fn trending(&self, page: PageQuery) -> Result<Vec<AnimeSummary>, FetchError> {
        self.get_list(
            format!("{BASE_URL}/top/anime"),
            &[
                ("page", page.page.to_string()),
                ("limit", page.per_page.to_string()),
            ],
        )
        .await
    }

    async fn airing(&self, _window: AiringWindow) -> Result<Vec<AnimeSummary>, FetchError> {
        // Jikan exposes a weekly broadcast schedule rather than a
        // timestamp-bounded feed; the whole week is the window.
        self.get_list(format!("{BASE_URL}/schedules"), &[]).await
    }

    async fn seasonal(
        &self,
        season: AnimeSeason,
        year: u32,
        page: PageQuery,
    ) -> Result<Vec<AnimeSummary>, FetchError> {
        let now = chrono::Utc::now();
        let url = if season == AnimeSeason::current() && year == now.year() as u32 {
            format!("{BASE_URL}/seasons/now")
        } else {
            format!("{BASE_URL}/seasons/{year}/{}", season.to_jikan_str())
        };
        self.get_list(url, &[("page", page.page.to_string())]).await
    }

    async fn detail(&self, id: &MediaId) -> Result<AnimeDetail, FetchError> {
        let numeric = match id {
            MediaId::Numeric(n) => *n,
            MediaId::Text(s) => s
                .parse()
                .map_err(|_| Self::err(FetchCause::Parse(format!("non-numeric MAL id: {s}"))))?,
        };

        let url = format!("{BASE_URL}/anime/{numeric}");
        tracing::debug!(%url, "Jikan request");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::err(e.into()))?;

        let resp = Self::check_response(resp).await.map_err(Self::err)?;
        let detail: JikanDetailResponse = resp
            .json()
            .await
            .map_err(|e| Self::err(FetchCause::Parse(e.to_string())))?;

        detail
            .data
            .into_detail()
            .ok_or_else(|| Self::err(FetchCause::Parse("record missing mal_id".into())))
    }
}
