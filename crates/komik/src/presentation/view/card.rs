use komik_lib::models::{BookmarkEntry, HistoryEntry, SeriesCard};

use crate::presentation::route::Route;

/// A series tile in any grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub slug: String,
    pub title: String,
    pub image: String,
    pub badge: Option<String>,
    pub badge_class: &'static str,
    pub subtitle: Option<String>,
}

impl Card {
    pub fn route(&self) -> Route {
        Route::Series(self.slug.clone())
    }
}

impl From<&SeriesCard> for Card {
    fn from(series: &SeriesCard) -> Self {
        Self {
            slug: series.slug.clone(),
            title: series.title.clone(),
            image: series.image.clone(),
            badge: series.kind.clone().filter(|kind| !kind.is_empty()),
            badge_class: type_class(series.kind.as_deref()),
            subtitle: series.chapter_label().map(str::to_string),
        }
    }
}

impl From<&HistoryEntry> for Card {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            slug: entry.slug.clone(),
            title: entry.title.clone(),
            image: entry.image.clone(),
            badge: None,
            badge_class: type_class(None),
            subtitle: entry.last_chapter_title.clone(),
        }
    }
}

impl From<&BookmarkEntry> for Card {
    fn from(bookmark: &BookmarkEntry) -> Self {
        Self {
            slug: bookmark.slug.clone(),
            title: bookmark.title.clone(),
            image: bookmark.image.clone(),
            badge: None,
            badge_class: type_class(None),
            subtitle: None,
        }
    }
}

/// Css class for the free-text series type
pub fn type_class(kind: Option<&str>) -> &'static str {
    let kind = kind.unwrap_or_default().to_lowercase();
    if kind.contains("manga") {
        "type-manga"
    } else if kind.contains("manhwa") {
        "type-manhwa"
    } else if kind.contains("manhua") {
        "type-manhua"
    } else {
        "type-default"
    }
}
