pub mod anime;
pub mod library;

pub use anime::{AiredDate, AnimeDetail, AnimeSummary, AnimeTitle, MediaId};
pub use library::{ContinueWatchingItem, FavoriteItem};
