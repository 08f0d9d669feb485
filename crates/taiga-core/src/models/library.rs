use serde::{Deserialize, Serialize};

/// Remaining playback time at or under which an episode counts as finished.
const NEARLY_FINISHED_SECS: f64 = 120.0;

/// One entry in the continue-watching rail, keyed by `content_url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinueWatchingItem {
    pub series_title: String,
    pub episode_title: String,
    pub episode_number: u32,
    pub image_url: Option<String>,
    pub content_url: String,
    /// Last playback position, seconds.
    pub last_played: f64,
    /// Episode duration, seconds.
    pub total_time: f64,
    /// Tag of the site/provider the stream came from.
    pub source: String,
}

impl ContinueWatchingItem {
    /// Whether the entry belongs in the rail. Episodes with 120 seconds or
    /// less remaining are suppressed as effectively finished.
    pub fn should_display(&self) -> bool {
        self.total_time - self.last_played > NEARLY_FINISHED_SECS
    }
}

/// A favorited title. Set semantics by `content_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteItem {
    pub title: String,
    pub image_url: Option<String>,
    pub content_url: String,
    pub source: String,
}
