use komik_lib::models::{ChapterRef, HistoryEntry, SeriesDetail};

use super::card::type_class;
use crate::presentation::route::Route;

pub const SYNOPSIS_CLAMP: usize = 300;

/// Where the primary button on a detail page takes the reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadAction {
    pub chapter_slug: String,
    pub series_slug: String,
    pub resume: bool,
}

impl ReadAction {
    pub fn route(&self) -> Route {
        Route::Chapter {
            id: self.chapter_slug.clone(),
            series: Some(self.series_slug.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub slug: String,
    pub title: String,
    pub image: String,
    pub rating: Option<String>,
    pub status: Option<String>,
    pub kind: Option<String>,
    pub badge_class: &'static str,
    pub genres: Vec<String>,
    pub synopsis: String,
    pub synopsis_expanded: bool,
    pub chapters: Vec<ChapterRef>,
    pub chapter_filter: String,
    pub primary: Option<ReadAction>,
    pub bookmarked: bool,
}

impl DetailView {
    pub fn new(
        slug: &str,
        detail: &SeriesDetail,
        saved: Option<&HistoryEntry>,
        bookmarked: bool,
    ) -> Self {
        Self {
            slug: slug.to_string(),
            title: detail.title.clone(),
            image: detail.image.clone(),
            rating: detail.rating.clone(),
            status: detail.status.clone(),
            kind: detail.kind.clone(),
            badge_class: type_class(detail.kind.as_deref()),
            genres: detail.genres.iter().map(|g| g.title.clone()).collect(),
            synopsis: detail.synopsis.clone().unwrap_or_default(),
            synopsis_expanded: false,
            chapters: detail.chapters.clone(),
            chapter_filter: String::new(),
            primary: primary_action(slug, detail, saved),
            bookmarked,
        }
    }

    /// True when the synopsis is long enough to need a read-more toggle
    pub fn synopsis_clamped(&self) -> bool {
        self.synopsis.chars().count() > SYNOPSIS_CLAMP
    }

    pub fn visible_synopsis(&self) -> String {
        if self.synopsis_expanded || !self.synopsis_clamped() {
            return self.synopsis.clone();
        }

        let mut clamped: String = self.synopsis.chars().take(SYNOPSIS_CLAMP).collect();
        clamped.push_str("...");
        clamped
    }

    pub fn visible_chapters(&self) -> Vec<&ChapterRef> {
        filter_chapters(&self.chapters, &self.chapter_filter)
    }
}

/// Resume from the saved chapter, else start at the earliest one
pub fn primary_action(
    slug: &str,
    detail: &SeriesDetail,
    saved: Option<&HistoryEntry>,
) -> Option<ReadAction> {
    let resume = saved
        .filter(|entry| entry.slug == slug)
        .and_then(|entry| entry.last_chapter_slug.clone())
        .filter(|chapter| !chapter.is_empty());

    match resume {
        Some(chapter_slug) => Some(ReadAction {
            chapter_slug,
            series_slug: slug.to_string(),
            resume: true,
        }),
        None => detail.earliest_chapter().map(|chapter| ReadAction {
            chapter_slug: chapter.slug.clone(),
            series_slug: slug.to_string(),
            resume: false,
        }),
    }
}

/// Case-insensitive substring match on chapter titles
pub fn filter_chapters<'a>(chapters: &'a [ChapterRef], query: &str) -> Vec<&'a ChapterRef> {
    let query = query.trim().to_lowercase();

    chapters
        .iter()
        .filter(|ch| query.is_empty() || ch.title.to_lowercase().contains(&query))
        .collect()
}
