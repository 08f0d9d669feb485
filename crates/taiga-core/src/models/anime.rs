use serde::{Deserialize, Serialize};

/// Displayed when a source omits every localized title.
pub const PLACEHOLDER_TITLE: &str = "Unknown title";

/// Provider-scoped opaque identifier.
///
/// A given series has an independent ID on every backend; values are never
/// comparable across providers and there is no canonical cross-provider key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaId {
    Numeric(u64),
    Text(String),
}

impl std::fmt::Display for MediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for MediaId {
    fn from(id: u64) -> Self {
        Self::Numeric(id)
    }
}

impl From<String> for MediaId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// Localized titles with a guaranteed primary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeTitle {
    pub primary: String,
    pub alternate: Option<String>,
    pub native: Option<String>,
}

impl AnimeTitle {
    /// Build a title from whatever localized names the source provided.
    /// The first available name becomes `primary`; if every name is missing,
    /// `primary` falls back to [`PLACEHOLDER_TITLE`].
    pub fn from_parts(
        primary: Option<String>,
        mut alternate: Option<String>,
        mut native: Option<String>,
    ) -> Self {
        let primary = primary
            .or_else(|| alternate.take())
            .or_else(|| native.take())
            .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string());
        Self {
            primary,
            alternate,
            native,
        }
    }
}

/// Canonical listing record, normalized from any provider response.
///
/// Only `id` and `title.primary` are guaranteed; every other field renders
/// as an "unknown" placeholder downstream when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeSummary {
    pub id: MediaId,
    pub title: AnimeTitle,
    pub cover_url: Option<String>,
    pub episodes: Option<u32>,
    pub synopsis: Option<String>,
    /// Epoch seconds of the next airing episode, when the provider knows it.
    pub next_airing_at: Option<i64>,
}

/// Decomposed calendar date as the canonical model carries it.
///
/// Kitsu sends dates as `yyyy-MM-dd` strings; AniList as fuzzy
/// `{year, month, day}` objects. Both normalize into this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiredDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl AiredDate {
    /// Parse a `yyyy-MM-dd` string into components.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.splitn(3, '-');
        let year: i32 = parts.next()?.parse().ok()?;
        let month: u32 = parts.next()?.parse().ok()?;
        let day: u32 = parts.next()?.parse().ok()?;
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        Some(Self { year, month, day })
    }
}

/// Full detail record for a single title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeDetail {
    pub summary: AnimeSummary,
    pub genres: Vec<String>,
    pub mean_score: Option<f32>,
    pub status: Option<String>,
    pub format: Option<String>,
    pub start_date: Option<AiredDate>,
    pub end_date: Option<AiredDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_prefers_primary() {
        let t = AnimeTitle::from_parts(
            Some("Toradora!".into()),
            Some("Tiger X Dragon".into()),
            Some("とらドラ！".into()),
        );
        assert_eq!(t.primary, "Toradora!");
        assert_eq!(t.alternate.as_deref(), Some("Tiger X Dragon"));
    }

    #[test]
    fn test_title_promotes_alternate() {
        let t = AnimeTitle::from_parts(None, Some("Tiger X Dragon".into()), None);
        assert_eq!(t.primary, "Tiger X Dragon");
        assert!(t.alternate.is_none());
    }

    #[test]
    fn test_title_placeholder_when_all_missing() {
        let t = AnimeTitle::from_parts(None, None, None);
        assert_eq!(t.primary, PLACEHOLDER_TITLE);
        assert!(t.alternate.is_none());
        assert!(t.native.is_none());
    }

    #[test]
    fn test_aired_date_parse() {
        assert_eq!(
            AiredDate::parse("1999-10-20"),
            Some(AiredDate {
                year: 1999,
                month: 10,
                day: 20
            })
        );
        assert_eq!(AiredDate::parse("1999-13-01"), None);
        assert_eq!(AiredDate::parse("not-a-date"), None);
        assert_eq!(AiredDate::parse(""), None);
    }

    #[test]
    fn test_media_id_serde_untagged() {
        let n: MediaId = serde_json::from_str("12").unwrap();
        assert_eq!(n, MediaId::Numeric(12));
        let s: MediaId = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(s, MediaId::Text("12".into()));
    }
}
