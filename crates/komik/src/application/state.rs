use komik_lib::models::{ChapterRef, CloudUser, Genre};

use super::carousel::Carousel;
use crate::presentation::{
    route::Route,
    view::{DetailView, HomeView, ReaderState, ReaderView},
};

/// Everything the client remembers between renders
#[derive(Default)]
pub struct AppState {
    pub current_user: Option<CloudUser>,
    /// Chapters of the series last opened, feeds the reader's jump list
    pub current_chapter_list: Vec<ChapterRef>,
    pub carousel: Option<Carousel>,
    pub genres: Vec<Genre>,
    pub home: Option<HomeView>,
    pub detail: Option<DetailView>,
    pub reader: Option<ReaderView>,
    pub reader_state: ReaderState,
}

impl AppState {
    /// Drops whatever belongs to the outgoing view
    pub fn teardown(&mut self, next: &Route) {
        if let Some(carousel) = self.carousel.take() {
            carousel.stop();
        }
        self.home = None;
        self.detail = None;
        self.reader = None;
        self.reader_state = ReaderState::Idle;

        if !matches!(next, Route::Series(_) | Route::Chapter { .. }) {
            self.current_chapter_list.clear();
        }
    }
}
