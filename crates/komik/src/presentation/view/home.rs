use komik_lib::models::{Genre, HomeData};

use super::card::Card;

/// A project update row: the series and the title of its newest chapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectUpdate {
    pub card: Card,
    pub latest_chapter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub hero: Vec<Card>,
    pub active: usize,
    pub latest: Vec<Card>,
    pub projects: Vec<ProjectUpdate>,
    pub genres: Vec<Genre>,
}

impl HomeView {
    pub fn new(data: &HomeData, hero_count: usize, latest_count: usize, genres: &[Genre]) -> Self {
        let projects = data
            .project_updates
            .iter()
            .map(|series| ProjectUpdate {
                card: Card::from(series),
                latest_chapter: series
                    .chapters
                    .first()
                    .map(|ch| ch.title.clone())
                    .or_else(|| series.chapter_label().map(str::to_string)),
            })
            .collect();

        Self {
            hero: data.hot_updates.iter().take(hero_count).map(Card::from).collect(),
            active: 0,
            latest: data
                .latest_releases
                .iter()
                .take(latest_count)
                .map(Card::from)
                .collect(),
            projects,
            genres: genres.to_vec(),
        }
    }

    /// Same view with another hero slide active, wrapping around
    pub fn with_active(&self, index: usize) -> Self {
        let mut view = self.clone();
        view.active = if self.hero.is_empty() {
            0
        } else {
            index % self.hero.len()
        };

        view
    }

    pub fn active_hero(&self) -> Option<&Card> {
        self.hero.get(self.active)
    }
}

/// Genres sorted for the filter, case-insensitively by title
pub fn sort_genres(genres: &mut [Genre]) {
    genres.sort_by_cached_key(|genre| genre.title.to_lowercase());
}
