use serde::Deserialize;

use taiga_core::models::{AiredDate, AnimeDetail, AnimeSummary, AnimeTitle, MediaId};

#[derive(Debug, Deserialize)]
pub struct JikanListResponse {
    #[serde(default)]
    pub data: Vec<JikanAnime>,
}

#[derive(Debug, Deserialize)]
pub struct JikanDetailResponse {
    pub data: JikanAnime,
}

#[derive(Debug, Deserialize)]
pub struct JikanAnime {
    pub mal_id: Option<u64>,
    pub title: Option<String>,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,
    pub images: Option<JikanImages>,
    pub episodes: Option<u32>,
    pub synopsis: Option<String>,
    pub score: Option<f32>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub genres: Vec<JikanGenre>,
    pub aired: Option<JikanAired>,
}

#[derive(Debug, Deserialize)]
pub struct JikanImages {
    pub jpg: Option<JikanImageSet>,
}

#[derive(Debug, Deserialize)]
pub struct JikanImageSet {
    pub image_url: Option<String>,
    pub large_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JikanGenre {
    pub name: Option<String>,
}

/// Jikan carries airing dates as ISO-8601 datetimes.
#[derive(Debug, Deserialize)]
pub struct JikanAired {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Take the calendar-date prefix of an ISO datetime like
/// `1999-10-20T00:00:00+00:00`.
fn iso_to_aired(value: &str) -> Option<AiredDate> {
    AiredDate::parse(value.split('T').next()?)
}

impl JikanAnime {
    /// `None` when the record carries no `mal_id`; the caller drops it.
    pub fn into_summary(self) -> Option<AnimeSummary> {
        let id = self.mal_id?;
        Some(AnimeSummary {
            id: MediaId::Numeric(id),
            title: AnimeTitle::from_parts(self.title, self.title_english, self.title_japanese),
            cover_url: self
                .images
                .and_then(|i| i.jpg)
                .and_then(|j| j.large_image_url.or(j.image_url)),
            episodes: self.episodes,
            synopsis: self.synopsis,
            next_airing_at: None,
        })
    }

    pub fn into_detail(mut self) -> Option<AnimeDetail> {
        let genres = std::mem::take(&mut self.genres)
            .into_iter()
            .filter_map(|g| g.name)
            .collect();
        let mean_score = self.score.take();
        let status = self.status.take();
        let format = self.media_type.take();
        let (start_date, end_date) = match self.aired.take() {
            Some(aired) => (
                aired.from.as_deref().and_then(iso_to_aired),
                aired.to.as_deref().and_then(iso_to_aired),
            ),
            None => (None, None),
        };
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_id_is_dropped_others_keep_order() {
        let json = r#"{
            "data": [
                { "mal_id": 20, "title": "Naruto" },
                { "title": "Orphan Entry" },
                { "mal_id": 21, "title": "One Piece" }
            ]
        }"#;

        let page: JikanListResponse = serde_json::from_str(json).unwrap();
        let summaries: Vec<_> = page
            .data
            .into_iter()
            .filter_map(JikanAnime::into_summary)
            .collect();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].title.primary, "Naruto");
        assert_eq!(summaries[1].title.primary, "One Piece");
    }

    #[test]
    fn test_detail_mapping_decomposes_dates() {
        let json = r#"{
            "data": {
                "mal_id": 4224,
                "title": "Toradora!",
                "title_english": "Toradora!",
                "images": { "jpg": { "image_url": "https://cdn.example/s.jpg", "large_image_url": "https://cdn.example/l.jpg" } },
                "episodes": 25,
                "synopsis": "Ryuuji Takasu...",
                "score": 8.05,
                "status": "Finished Airing",
                "type": "TV",
                "genres": [ { "name": "Comedy" }, { "name": "Romance" } ],
                "aired": { "from": "2008-10-02T00:00:00+00:00", "to": "2009-03-26T00:00:00+00:00" }
            }
        }"#;

        let resp: JikanDetailResponse = serde_json::from_str(json).unwrap();
        let detail = resp.data.into_detail().unwrap();

        assert_eq!(detail.summary.id, MediaId::Numeric(4224));
        assert_eq!(
            detail.summary.cover_url.as_deref(),
            Some("https://cdn.example/l.jpg")
        );
        assert_eq!(detail.genres, vec!["Comedy", "Romance"]);
        assert_eq!(
            detail.start_date,
            Some(AiredDate {
                year: 2008,
                month: 10,
                day: 2
            })
        );
        assert_eq!(
            detail.end_date,
            Some(AiredDate {
                year: 2009,
                month: 3,
                day: 26
            })
        );
    }

    #[test]
    fn test_bare_record_gets_placeholder_title() {
        let json = r#"{ "mal_id": 99 }"#;
        let anime: JikanAnime = serde_json::from_str(json).unwrap();
        let summary = anime.into_summary().unwrap();
        assert_eq!(summary.title.primary, "Unknown title");
        assert!(summary.cover_url.is_none());
    }
}
