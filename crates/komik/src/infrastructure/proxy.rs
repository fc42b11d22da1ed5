use async_trait::async_trait;
use komik_lib::{
    error::FetchError,
    models::{ChapterDetail, DataWrapper, Envelope, Genre, HomeData, ListPage, SeriesDetail},
};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::repositories::catalogue::CatalogueRepository;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Aggregator client that routes every request through the proxy as
/// `GET {proxy}?url=<target>`.
#[derive(Clone)]
pub struct ProxyCatalogue {
    client: reqwest::Client,
    proxy: Url,
    api_base: Url,
}

impl ProxyCatalogue {
    pub fn new(proxy: &str, api_base: &str) -> Result<Self, anyhow::Error> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            proxy: Url::parse(proxy)?,
            api_base: Url::parse(api_base)?,
        })
    }

    /// Upstream url for the given path segments, each one percent-encoded
    pub fn target(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Full proxied request url for a target
    pub fn proxied(&self, target: &Url) -> Url {
        let mut url = self.proxy.clone();
        url.query_pairs_mut().append_pair("url", target.as_str());
        url
    }

    async fn request(&self, target: &Url) -> Result<Value, FetchError> {
        let res = self
            .client
            .get(self.proxied(target))
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !res.status().is_success() {
            return Err(FetchError::Network(format!("status {}", res.status())));
        }

        let body = res
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Envelope::from_slice(&body)?.into_payload()
    }

    /// Unwrapped payload for a target, `None` on any failure
    pub async fn fetch_api(&self, target: &Url) -> Option<Value> {
        match self.request(target).await {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!("fetch {target} failed: {e}");
                None
            }
        }
    }

    async fn fetch_as<T: DeserializeOwned>(&self, target: Url) -> Option<T> {
        let payload = self.fetch_api(&target).await?;

        match serde_json::from_value(payload) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("fetch {target} failed: {}", FetchError::Protocol(e.to_string()));
                None
            }
        }
    }
}

#[async_trait]
impl CatalogueRepository for ProxyCatalogue {
    async fn fetch_home(&self) -> Option<HomeData> {
        self.fetch_as::<DataWrapper<HomeData>>(self.target(&["home"]))
            .await
            .map(|wrapper| wrapper.data)
    }

    async fn fetch_detail(&self, slug: &str) -> Option<SeriesDetail> {
        self.fetch_as::<DataWrapper<SeriesDetail>>(self.target(&["detail", slug]))
            .await
            .map(|wrapper| wrapper.data)
    }

    async fn fetch_chapter(&self, slug: &str) -> Option<ChapterDetail> {
        self.fetch_as::<DataWrapper<ChapterDetail>>(self.target(&["chapter", slug]))
            .await
            .map(|wrapper| wrapper.data)
    }

    async fn fetch_list(&self, status: &str, order_by: &str, page: u32) -> Option<ListPage> {
        let mut target = self.target(&["list"]);
        target
            .query_pairs_mut()
            .append_pair("status", status)
            .append_pair("orderby", order_by)
            .append_pair("page", &page.to_string());

        self.fetch_as(target).await
    }

    async fn fetch_genre(&self, slug: &str, page: u32) -> Option<ListPage> {
        self.fetch_as(self.target(&["genre", slug, &page.to_string()]))
            .await
    }

    async fn fetch_genres(&self) -> Option<Vec<Genre>> {
        self.fetch_as::<DataWrapper<Vec<Genre>>>(self.target(&["genres"]))
            .await
            .map(|wrapper| wrapper.data)
    }

    async fn fetch_search(&self, query: &str, page: u32) -> Option<ListPage> {
        self.fetch_as(self.target(&["search", query, &page.to_string()]))
            .await
    }
}
