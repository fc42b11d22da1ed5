use async_trait::async_trait;
use komik_lib::{
    error::FetchError,
    models::{IdRequest, IdResponse, SlugKind, SlugMapping},
};
use reqwest::{StatusCode, Url};

use crate::domain::repositories::resolver::IdResolver;

/// Talks to the `/api/get-id` and `/api/get-slug` backend
#[derive(Clone)]
pub struct HttpIdResolver {
    client: reqwest::Client,
    backend_url: String,
}

impl HttpIdResolver {
    pub fn new(backend_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            backend_url: backend_url.trim_end_matches('/').to_string(),
        }
    }

    /// Backend url for the given path segments, each one percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url =
            Url::parse(&self.backend_url).map_err(|e| FetchError::Protocol(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::Protocol(format!("not a base url: {}", self.backend_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn request_id(&self, slug: &str, kind: SlugKind) -> Result<String, FetchError> {
        let res = self
            .client
            .post(self.endpoint(&["api", "get-id"])?)
            .json(&IdRequest {
                slug: slug.to_string(),
                kind,
            })
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let data: IdResponse = res
            .json()
            .await
            .map_err(|e| FetchError::Protocol(e.to_string()))?;

        Ok(data.uuid)
    }

    async fn request_slug(&self, id: &str) -> Result<SlugMapping, FetchError> {
        let res = self
            .client
            .get(self.endpoint(&["api", "get-slug", id])?)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        match res.status() {
            StatusCode::NOT_FOUND => Err(FetchError::NotFound),
            status if !status.is_success() => Err(FetchError::Network(format!("status {status}"))),
            _ => res
                .json()
                .await
                .map_err(|e| FetchError::Protocol(e.to_string())),
        }
    }
}

#[async_trait]
impl IdResolver for HttpIdResolver {
    async fn resolve_id(&self, slug: &str, kind: SlugKind) -> String {
        match self.request_id(slug, kind).await {
            Ok(uuid) => uuid,
            Err(e) => {
                debug!("falling back to slug {slug}: {e}");
                slug.to_string()
            }
        }
    }

    async fn resolve_slug(&self, id: &str) -> Option<SlugMapping> {
        match self.request_slug(id).await {
            Ok(mapping) => Some(mapping),
            Err(e) => {
                debug!("no slug for {id}: {e}");
                None
            }
        }
    }
}
