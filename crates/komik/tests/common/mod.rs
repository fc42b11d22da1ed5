#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use komik::{
    application::{ClientController, ControllerBuilder, ViewOptions},
    domain::repositories::{
        catalogue::CatalogueRepository,
        cloud::{CloudRepository, CloudRepositoryError},
        resolver::IdResolver,
    },
    infrastructure::storage::MemoryStorage,
    presentation::surface::HtmlSurface,
};
use komik_lib::models::{
    ChapterDetail, CloudHistoryRow, CloudUser, Genre, HomeData, ListPage, SeriesDetail, SlugKind,
    SlugMapping,
};
use serde_json::{json, Value};
use tokio::sync::Notify;

pub fn from_json<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).unwrap()
}

pub fn one_piece() -> SeriesDetail {
    from_json(json!({
        "title": "One Piece",
        "image": "op.jpg",
        "type": "Manga",
        "chapters": [
            { "slug": "ch-2", "title": "Chapter 2" },
            { "slug": "ch-1", "title": "Chapter 1" }
        ]
    }))
}

#[derive(Default)]
pub struct FakeCatalogue {
    pub home: Option<HomeData>,
    pub details: HashMap<String, SeriesDetail>,
    pub chapters: HashMap<String, ChapterDetail>,
    pub lists: HashMap<String, ListPage>,
    pub genres: Option<Vec<Genre>>,
    /// When set, detail fetches wait for a permit
    pub gate: Option<Arc<Notify>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeCatalogue {
    pub fn with_detail(mut self, slug: &str, detail: SeriesDetail) -> Self {
        self.details.insert(slug.to_string(), detail);
        self
    }

    pub fn with_chapter(mut self, slug: &str, chapter: ChapterDetail) -> Self {
        self.chapters.insert(slug.to_string(), chapter);
        self
    }

    pub fn with_list(mut self, key: &str, page: ListPage) -> Self {
        self.lists.insert(key.to_string(), page);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn call(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CatalogueRepository for FakeCatalogue {
    async fn fetch_home(&self) -> Option<HomeData> {
        self.call("home".to_string());
        self.home.clone()
    }

    async fn fetch_detail(&self, slug: &str) -> Option<SeriesDetail> {
        self.call(format!("detail/{slug}"));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.details.get(slug).cloned()
    }

    async fn fetch_chapter(&self, slug: &str) -> Option<ChapterDetail> {
        self.call(format!("chapter/{slug}"));
        self.chapters.get(slug).cloned()
    }

    async fn fetch_list(&self, status: &str, _order_by: &str, page: u32) -> Option<ListPage> {
        let key = format!("list/{status}/{page}");
        self.call(key.clone());
        self.lists.get(&key).cloned()
    }

    async fn fetch_genre(&self, slug: &str, page: u32) -> Option<ListPage> {
        let key = format!("genre/{slug}/{page}");
        self.call(key.clone());
        self.lists.get(&key).cloned()
    }

    async fn fetch_genres(&self) -> Option<Vec<Genre>> {
        self.genres.clone()
    }

    async fn fetch_search(&self, query: &str, page: u32) -> Option<ListPage> {
        let key = format!("search/{query}/{page}");
        self.call(key.clone());
        self.lists.get(&key).cloned()
    }
}

/// Hands out v4 uuids like the mapping backend, in memory
#[derive(Default)]
pub struct FakeResolver {
    ids: Mutex<HashMap<(String, SlugKind), String>>,
}

impl FakeResolver {
    pub fn id_of(&self, slug: &str, kind: SlugKind) -> Option<String> {
        self.ids
            .lock()
            .unwrap()
            .get(&(slug.to_string(), kind))
            .cloned()
    }
}

#[async_trait]
impl IdResolver for FakeResolver {
    async fn resolve_id(&self, slug: &str, kind: SlugKind) -> String {
        self.ids
            .lock()
            .unwrap()
            .entry((slug.to_string(), kind))
            .or_insert_with(|| uuid::Uuid::new_v4().to_string())
            .clone()
    }

    async fn resolve_slug(&self, id: &str) -> Option<SlugMapping> {
        self.ids
            .lock()
            .unwrap()
            .iter()
            .find(|(_, uuid)| uuid.as_str() == id)
            .map(|((slug, kind), _)| SlugMapping {
                slug: slug.clone(),
                kind: *kind,
            })
    }
}

#[derive(Default)]
pub struct FakeCloud {
    pub user: Option<CloudUser>,
    pub fail_fetch: bool,
    pub rows: Mutex<Vec<CloudHistoryRow>>,
    pub signed_out: Mutex<bool>,
}

impl FakeCloud {
    pub fn signed_in(id: &str) -> Self {
        Self {
            user: Some(CloudUser {
                id: id.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn rows(&self) -> Vec<CloudHistoryRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl CloudRepository for FakeCloud {
    async fn current_user(&self) -> Result<Option<CloudUser>, CloudRepositoryError> {
        if *self.signed_out.lock().unwrap() {
            return Ok(None);
        }
        Ok(self.user.clone())
    }

    async fn upsert_history(&self, rows: &[CloudHistoryRow]) -> Result<(), CloudRepositoryError> {
        let mut stored = self.rows.lock().unwrap();
        for row in rows {
            stored.retain(|r| !(r.user_id == row.user_id && r.slug == row.slug));
            stored.push(row.clone());
        }
        Ok(())
    }

    async fn fetch_history(
        &self,
        user_id: &str,
    ) -> Result<Vec<CloudHistoryRow>, CloudRepositoryError> {
        if self.fail_fetch {
            return Err(CloudRepositoryError::Status(500));
        }

        let mut rows: Vec<CloudHistoryRow> = self
            .rows()
            .into_iter()
            .filter(|row| row.user_id == user_id)
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows)
    }

    fn login_url(&self, redirect_to: &str) -> String {
        format!("https://cloud.local/auth/v1/authorize?redirect_to={redirect_to}")
    }

    async fn sign_out(&self) -> Result<(), CloudRepositoryError> {
        *self.signed_out.lock().unwrap() = true;
        Ok(())
    }
}

pub struct Harness {
    pub controller: Arc<ClientController<HtmlSurface>>,
    pub catalogue: Arc<FakeCatalogue>,
    pub resolver: Arc<FakeResolver>,
}

impl Harness {
    pub fn new(catalogue: FakeCatalogue) -> Self {
        Self::build(catalogue, None, ViewOptions::default())
    }

    pub fn with_cloud(catalogue: FakeCatalogue, cloud: Arc<FakeCloud>) -> Self {
        Self::build(catalogue, Some(cloud), ViewOptions::default())
    }

    pub fn with_options(catalogue: FakeCatalogue, options: ViewOptions) -> Self {
        Self::build(catalogue, None, options)
    }

    fn build(
        catalogue: FakeCatalogue,
        cloud: Option<Arc<FakeCloud>>,
        options: ViewOptions,
    ) -> Self {
        let catalogue = Arc::new(catalogue);
        let resolver = Arc::new(FakeResolver::default());

        let mut builder = ControllerBuilder::new()
            .with_catalogue(catalogue.clone())
            .with_resolver(resolver.clone())
            .with_storage(Arc::new(MemoryStorage::new()))
            .with_options(options);
        if let Some(cloud) = cloud {
            builder = builder.with_cloud(cloud);
        }

        Self {
            controller: Arc::new(builder.build(HtmlSurface::new()).unwrap()),
            catalogue,
            resolver,
        }
    }

    pub fn content(&self) -> String {
        self.controller
            .with_surface(|surface| surface.content().to_string())
    }

    pub fn renders(&self) -> usize {
        self.controller.with_surface(|surface| surface.renders())
    }
}
