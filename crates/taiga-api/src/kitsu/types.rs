use serde::Deserialize;

use taiga_core::models::{AiredDate, AnimeDetail, AnimeSummary, AnimeTitle, MediaId};

// ── JSON:API response envelopes ──────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JsonApiListResponse {
    #[serde(default)]
    pub data: Vec<JsonApiResource>,
}

#[derive(Debug, Deserialize)]
pub struct JsonApiSingleResponse {
    pub data: JsonApiResource,
}

#[derive(Debug, Deserialize)]
pub struct JsonApiResource {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub attributes: serde_json::Value,
}

// ── Kitsu attribute types ────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitsuAnimeAttributes {
    pub canonical_title: Option<String>,
    pub titles: Option<KitsuTitles>,
    pub episode_count: Option<u32>,
    pub poster_image: Option<KitsuImage>,
    pub average_rating: Option<String>,
    pub synopsis: Option<String>,
    pub subtype: Option<String>,
    pub status: Option<String>,
    /// `yyyy-MM-dd`, decomposed into [`AiredDate`] during mapping.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KitsuTitles {
    pub en: Option<String>,
    pub en_jp: Option<String>,
    pub ja_jp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KitsuImage {
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
}

// ── Conversions ──────────────────────────────────────────────────

/// Decode one list resource into a summary, or `None` when the id or
/// attributes don't decode; the caller drops such records.
pub fn resource_into_summary(resource: JsonApiResource) -> Option<AnimeSummary> {
    let id = resource.id.parse::<u64>().ok()?;
    let attrs: KitsuAnimeAttributes = serde_json::from_value(resource.attributes).ok()?;
    Some(attrs.into_summary(id))
}

impl KitsuAnimeAttributes {
    pub fn into_summary(self, id: u64) -> AnimeSummary {
        let (en, en_jp) = match self.titles {
            Some(t) => (t.en, t.en_jp),
            None => (None, None),
        };
        AnimeSummary {
            id: MediaId::Numeric(id),
            title: AnimeTitle::from_parts(self.canonical_title.or(en_jp), en, None),
            cover_url: self
                .poster_image
                .and_then(|p| p.medium.or(p.large).or(p.small)),
            episodes: self.episode_count,
            synopsis: self.synopsis,
            next_airing_at: None,
        }
    }

    pub fn into_detail(mut self, id: u64) -> AnimeDetail {
        // Kitsu ratings are 0-100 strings; the canonical scale is 0-10.
        let mean_score = self
            .average_rating
            .take()
            .and_then(|s| s.parse::<f32>().ok())
            .map(|r| r / 10.0);
        let status = self.status.take();
        let format = self.subtype.take();
        let start_date = self.start_date.take().as_deref().and_then(AiredDate::parse);
        let end_date = self.end_date.take().as_deref().and_then(AiredDate::parse);
        AnimeDetail {
            summary: self.into_summary(id),
            genres: Vec::new(), // Kitsu genres require a separate include
            mean_score,
            status,
            format,
            start_date,
            end_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_decode_drops_bad_ids_keeps_order() {
        let json = r#"{
            "data": [
                { "id": "12", "type": "anime", "attributes": { "canonicalTitle": "One Piece" } },
                { "id": "not-numeric", "type": "anime", "attributes": { "canonicalTitle": "Ghost" } },
                { "id": "13", "type": "anime", "attributes": { "canonicalTitle": "Hyouka" } }
            ]
        }"#;

        let resp: JsonApiListResponse = serde_json::from_str(json).unwrap();
        let summaries: Vec<_> = resp
            .data
            .into_iter()
            .filter_map(resource_into_summary)
            .collect();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].title.primary, "One Piece");
        assert_eq!(summaries[1].title.primary, "Hyouka");
    }

    #[test]
    fn test_date_decomposition() {
        let json = r#"{
            "canonicalTitle": "One Piece",
            "startDate": "1999-10-20",
            "endDate": null
        }"#;

        let attrs: KitsuAnimeAttributes = serde_json::from_str(json).unwrap();
        let detail = attrs.into_detail(12);
        assert_eq!(
            detail.start_date,
            Some(AiredDate {
                year: 1999,
                month: 10,
                day: 20
            })
        );
        assert!(detail.end_date.is_none());
    }

    #[test]
    fn test_title_fallback_chain() {
        let json = r#"{ "titles": { "en": "One Piece EN", "en_jp": "One Piece" } }"#;
        let attrs: KitsuAnimeAttributes = serde_json::from_str(json).unwrap();
        let summary = attrs.into_summary(12);
        // canonicalTitle absent: en_jp becomes primary, en stays alternate
        assert_eq!(summary.title.primary, "One Piece");
        assert_eq!(summary.title.alternate.as_deref(), Some("One Piece EN"));
    }

    #[test]
    fn test_no_titles_at_all_gets_placeholder() {
        let attrs: KitsuAnimeAttributes = serde_json::from_str("{}").unwrap();
        let summary = attrs.into_summary(7);
        assert_eq!(summary.title.primary, "Unknown title");
    }

    #[test]
    fn test_rating_scale() {
        let json = r#"{ "canonicalTitle": "One Piece", "averageRating": "83.45" }"#;
        let attrs: KitsuAnimeAttributes = serde_json::from_str(json).unwrap();
        let detail = attrs.into_detail(12);
        assert!((detail.mean_score.unwrap() - 8.345).abs() < 0.01);
    }
}
