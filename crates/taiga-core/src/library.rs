//! Favorites and continue-watching persistence.
//!
//! Both lists are JSON arrays under config keys; a corrupt blob degrades to
//! an empty list rather than surfacing an error. Lists are insertion-ordered
//! with the newest activity first.

use crate::config::{keys, ConfigStore};
use crate::error::CoreError;
use crate::models::{ContinueWatchingItem, FavoriteItem};

pub struct LibraryStore<C> {
    config: C,
}

impl<C: ConfigStore> LibraryStore<C> {
    pub fn new(config: C) -> Self {
        Self { config }
    }

    // ── Favorites ───────────────────────────────────────────────

    pub fn favorites(&self) -> Vec<FavoriteItem> {
        self.config.get_json(keys::FAVORITES).unwrap_or_default()
    }

    /// Add a favorite. Idempotent: an entry with the same `content_url`
    /// already present leaves the list untouched.
    pub fn add_favorite(&self, item: FavoriteItem) -> Result<(), CoreError> {
        let mut list = self.favorites();
        if list.iter().any(|f| f.content_url == item.content_url) {
            return Ok(());
        }
        list.insert(0, item);
        self.config.set_json(keys::FAVORITES, &list)
    }

    /// Remove by `content_url`. Removing an absent entry is a no-op.
    pub fn remove_favorite(&self, content_url: &str) -> Result<(), CoreError> {
        let mut list = self.favorites();
        let before = list.len();
        list.retain(|f| f.content_url != content_url);
        if list.len() == before {
            return Ok(());
        }
        self.config.set_json(keys::FAVORITES, &list)
    }

    pub fn is_favorite(&self, content_url: &str) -> bool {
        self.favorites()
            .iter()
            .any(|f| f.content_url == content_url)
    }

    // ── Continue watching ───────────────────────────────────────

    pub fn continue_watching(&self) -> Vec<ContinueWatchingItem> {
        self.config
            .get_json(keys::CONTINUE_WATCHING)
            .unwrap_or_default()
    }

    /// Entries that belong in the rail (near-finished ones suppressed).
    pub fn visible_continue_watching(&self) -> Vec<ContinueWatchingItem> {
        self.continue_watching()
            .into_iter()
            .filter(ContinueWatchingItem::should_display)
            .collect()
    }

    /// Record a playback-position checkpoint.
    ///
    /// With merge-watching enabled, an item for a series the list already
    /// tracks replaces that entry only when its episode number is strictly
    /// greater; a lower episode leaves the existing entry alone, except that
    /// an identical `content_url` updates the entry in place (normal
    /// rewatch-position bookkeeping). Without merge, entries dedup by
    /// `content_url` and the newest activity moves to the front.
    pub fn checkpoint(&self, item: ContinueWatchingItem) -> Result<(), CoreError> {
        let mut list = self.continue_watching();

        if self.config.merge_watching() {
            if let Some(pos) = list
                .iter()
                .position(|e| e.series_title == item.series_title)
            {
                if item.episode_number > list[pos].episode_number {
                    list.remove(pos);
                    list.insert(0, item);
                } else if list[pos].content_url == item.content_url {
                    list[pos] = item;
                }
                return self.config.set_json(keys::CONTINUE_WATCHING, &list);
            }
        }

        if let Some(pos) = list.iter().position(|e| e.content_url == item.content_url) {
            list.remove(pos);
        }
        list.insert(0, item);
        self.config.set_json(keys::CONTINUE_WATCHING, &list)
    }

    pub fn remove_continue_watching(&self, content_url: &str) -> Result<(), CoreError> {
        let mut list = self.continue_watching();
        let before = list.len();
        list.retain(|e| e.content_url != content_url);
        if list.len() == before {
            return Ok(());
        }
        self.config.set_json(keys::CONTINUE_WATCHING, &list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;

    fn store() -> LibraryStore<MemoryConfigStore> {
        LibraryStore::new(MemoryConfigStore::new())
    }

    fn favorite(url: &str) -> FavoriteItem {
        FavoriteItem {
            title: "Toradora!".into(),
            image_url: None,
            content_url: url.into(),
            source: "gogo".into(),
        }
    }

    fn episode(series: &str, episode: u32, url: &str) -> ContinueWatchingItem {
        ContinueWatchingItem {
            series_title: series.into(),
            episode_title: format!("Episode {episode}"),
            episode_number: episode,
            image_url: None,
            content_url: url.into(),
            last_played: 60.0,
            total_time: 1440.0,
            source: "gogo".into(),
        }
    }

    #[test]
    fn test_add_favorite_is_idempotent() {
        let lib = store();
        lib.add_favorite(favorite("https://example.com/a")).unwrap();
        lib.add_favorite(favorite("https://example.com/a")).unwrap();
        assert_eq!(lib.favorites().len(), 1);
    }

    #[test]
    fn test_remove_absent_favorite_is_noop() {
        let lib = store();
        lib.add_favorite(favorite("https://example.com/a")).unwrap();
        lib.remove_favorite("https://example.com/missing").unwrap();
        assert_eq!(lib.favorites().len(), 1);
        lib.remove_favorite("https://example.com/a").unwrap();
        assert!(lib.favorites().is_empty());
    }

    #[test]
    fn test_corrupt_list_degrades_to_empty() {
        let config = MemoryConfigStore::new();
        config.set_raw(keys::FAVORITES, "[{broken").unwrap();
        config.set_raw(keys::CONTINUE_WATCHING, "42").unwrap();
        let lib = LibraryStore::new(config);
        assert!(lib.favorites().is_empty());
        assert!(lib.continue_watching().is_empty());
    }

    #[test]
    fn test_checkpoint_dedups_by_url_newest_first() {
        let lib = store();
        lib.checkpoint(episode("Toradora!", 1, "https://example.com/t/1"))
            .unwrap();
        lib.checkpoint(episode("Hyouka", 3, "https://example.com/h/3"))
            .unwrap();

        let mut rewatch = episode("Toradora!", 1, "https://example.com/t/1");
        rewatch.last_played = 900.0;
        lib.checkpoint(rewatch).unwrap();

        let list = lib.continue_watching();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].content_url, "https://example.com/t/1");
        assert_eq!(list[0].last_played, 900.0);
        assert_eq!(list[1].content_url, "https://example.com/h/3");
    }

    #[test]
    fn test_merge_replaces_with_higher_episode() {
        let config = MemoryConfigStore::new();
        config.set_merge_watching(true).unwrap();
        let lib = LibraryStore::new(config);

        lib.checkpoint(episode("Toradora!", 3, "https://example.com/t/3"))
            .unwrap();
        lib.checkpoint(episode("Toradora!", 5, "https://example.com/t/5"))
            .unwrap();

        let list = lib.continue_watching();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].episode_number, 5);
    }

    #[test]
    fn test_merge_keeps_existing_over_lower_episode() {
        let config = MemoryConfigStore::new();
        config.set_merge_watching(true).unwrap();
        let lib = LibraryStore::new(config);

        lib.checkpoint(episode("Toradora!", 3, "https://example.com/t/3"))
            .unwrap();
        lib.checkpoint(episode("Toradora!", 2, "https://example.com/t/2"))
            .unwrap();

        let list = lib.continue_watching();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].episode_number, 3);
        assert_eq!(list[0].content_url, "https://example.com/t/3");
    }

    #[test]
    fn test_merge_same_url_updates_in_place() {
        let config = MemoryConfigStore::new();
        config.set_merge_watching(true).unwrap();
        let lib = LibraryStore::new(config);

        lib.checkpoint(episode("Toradora!", 3, "https://example.com/t/3"))
            .unwrap();
        lib.checkpoint(episode("Hyouka", 1, "https://example.com/h/1"))
            .unwrap();

        let mut again = episode("Toradora!", 3, "https://example.com/t/3");
        again.last_played = 1200.0;
        lib.checkpoint(again).unwrap();

        let list = lib.continue_watching();
        assert_eq!(list.len(), 2);
        // position preserved: the in-place update does not move the entry
        assert_eq!(list[0].series_title, "Hyouka");
        assert_eq!(list[1].last_played, 1200.0);
    }

    #[test]
    fn test_visible_filters_near_finished() {
        let lib = store();
        let mut nearly_done = episode("Toradora!", 25, "https://example.com/t/25");
        nearly_done.last_played = nearly_done.total_time - 60.0;
        lib.checkpoint(nearly_done).unwrap();
        lib.checkpoint(episode("Hyouka", 1, "https://example.com/h/1"))
            .unwrap();

        let visible = lib.visible_continue_watching();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].series_title, "Hyouka");
        // the suppressed entry still exists in the raw list
        assert_eq!(lib.continue_watching().len(), 2);
    }
}
