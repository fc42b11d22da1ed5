use async_trait::async_trait;
use komik_lib::models::{ChapterDetail, Genre, HomeData, ListPage, SeriesDetail};

/// Read access to the comic aggregator. Every failure is collapsed into
/// `None`, callers render an error view for it.
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    async fn fetch_home(&self) -> Option<HomeData>;

    async fn fetch_detail(&self, slug: &str) -> Option<SeriesDetail>;

    async fn fetch_chapter(&self, slug: &str) -> Option<ChapterDetail>;

    async fn fetch_list(&self, status: &str, order_by: &str, page: u32) -> Option<ListPage>;

    async fn fetch_genre(&self, slug: &str, page: u32) -> Option<ListPage>;

    async fn fetch_genres(&self) -> Option<Vec<Genre>>;

    async fn fetch_search(&self, query: &str, page: u32) -> Option<ListPage>;
}
