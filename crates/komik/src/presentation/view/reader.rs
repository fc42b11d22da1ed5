use komik_lib::models::{ChapterDetail, ChapterRef};

use crate::presentation::route::Route;

/// Lifecycle of the reader for one navigation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReaderState {
    #[default]
    Idle,
    ShellShown,
    DataFetched(bool),
    ImagesRendering,
    Settled,
    ErrorShown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderEvent {
    Open,
    Fetched(bool),
    Rendered { pending: bool },
    ImagesSettled,
    Retry,
}

impl ReaderState {
    /// Next state for an event, unchanged when the event does not apply
    pub fn on(self, event: ReaderEvent) -> Self {
        use ReaderEvent::*;
        use ReaderState::*;

        match (self, event) {
            (Idle, Open) => ShellShown,
            (ShellShown, Fetched(success)) => DataFetched(success),
            (DataFetched(true), Rendered { pending: true }) => ImagesRendering,
            (DataFetched(true), Rendered { pending: false }) => Settled,
            (DataFetched(false), Rendered { .. }) => ErrorShown,
            (ImagesRendering, ImagesSettled) => Settled,
            (Settled, Retry) => ImagesRendering,
            (ErrorShown, Retry) => Idle,
            (state, _) => state,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Pending,
    Loaded,
    Errored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub url: String,
    pub state: ImageState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpOption {
    pub slug: String,
    pub title: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderView {
    pub chapter_slug: String,
    pub title: String,
    pub series_slug: Option<String>,
    pub images: Vec<PageImage>,
    pub prev: Option<Route>,
    pub next: Option<Route>,
    pub jump: Vec<JumpOption>,
}

impl ReaderView {
    /// `chapters` is the list last seen on the detail page, possibly empty
    pub fn new(
        chapter_slug: &str,
        series_slug: Option<&str>,
        chapter: &ChapterDetail,
        chapters: &[ChapterRef],
    ) -> Self {
        let series_slug = series_slug
            .filter(|slug| !slug.is_empty())
            .or(chapter.series_slug())
            .map(str::to_string);

        let link = |slug: &Option<String>| {
            slug.as_ref()
                .filter(|slug| !slug.is_empty())
                .map(|slug| Route::Chapter {
                    id: slug.clone(),
                    series: series_slug.clone(),
                })
        };

        Self {
            chapter_slug: chapter_slug.to_string(),
            title: chapter_title(chapter_slug, chapter, chapters),
            images: chapter
                .images
                .iter()
                .map(|url| PageImage {
                    url: url.clone(),
                    state: ImageState::Pending,
                })
                .collect(),
            prev: link(&chapter.navigation.prev),
            next: link(&chapter.navigation.next),
            jump: chapters
                .iter()
                .map(|ch| JumpOption {
                    slug: ch.slug.clone(),
                    title: ch.title.clone(),
                    selected: ch.slug == chapter_slug,
                })
                .collect(),
            series_slug,
        }
    }

    pub fn is_settled(&self) -> bool {
        !self.images.iter().any(|img| img.state == ImageState::Pending)
    }

    fn transition(&mut self, index: usize, from: &[ImageState], to: ImageState) -> bool {
        match self.images.get_mut(index) {
            Some(image) if from.contains(&image.state) => {
                image.state = to;
                true
            }
            _ => false,
        }
    }

    pub fn image_loaded(&mut self, index: usize) -> bool {
        self.transition(index, &[ImageState::Pending], ImageState::Loaded)
    }

    pub fn image_failed(&mut self, index: usize) -> bool {
        self.transition(index, &[ImageState::Pending], ImageState::Errored)
    }

    pub fn retry_image(&mut self, index: usize) -> bool {
        self.transition(index, &[ImageState::Errored], ImageState::Pending)
    }
}

fn chapter_title(slug: &str, chapter: &ChapterDetail, chapters: &[ChapterRef]) -> String {
    chapters
        .iter()
        .find(|ch| ch.slug == slug && !ch.title.is_empty())
        .map(|ch| ch.title.clone())
        .or_else(|| chapter.title.clone().filter(|title| !title.is_empty()))
        .unwrap_or_else(|| slug.replace('-', " "))
}
