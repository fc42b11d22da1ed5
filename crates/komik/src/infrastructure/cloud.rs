use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use komik_lib::models::{CloudHistoryRow, CloudUser};
use reqwest::{RequestBuilder, StatusCode, Url};

use crate::{
    domain::repositories::cloud::{CloudRepository, CloudRepositoryError},
    infrastructure::config::CloudConfig,
};

/// History table behind a PostgREST api, session from a GoTrue auth server
pub struct SupabaseCloud {
    client: reqwest::Client,
    url: String,
    key: String,
    access_token: RwLock<Option<String>>,
}

impl SupabaseCloud {
    pub fn new(config: &CloudConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url.trim_end_matches('/').to_string(),
            key: config.key.clone(),
            access_token: RwLock::new(config.access_token.clone()),
        }
    }

    fn token(&self) -> Option<String> {
        self.access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn authorized(&self, req: RequestBuilder) -> Result<RequestBuilder, CloudRepositoryError> {
        let token = self.token().ok_or(CloudRepositoryError::NoSession)?;

        Ok(req.header("apikey", &self.key).bearer_auth(token))
    }
}

#[async_trait]
impl CloudRepository for SupabaseCloud {
    async fn current_user(&self) -> Result<Option<CloudUser>, CloudRepositoryError> {
        if self.token().is_none() {
            return Ok(None);
        }

        let res = self
            .authorized(self.client.get(format!("{}/auth/v1/user", self.url)))?
            .send()
            .await?;

        match res.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if !status.is_success() => Err(CloudRepositoryError::Status(status.as_u16())),
            _ => Ok(Some(res.json().await?)),
        }
    }

    async fn upsert_history(&self, rows: &[CloudHistoryRow]) -> Result<(), CloudRepositoryError> {
        let res = self
            .authorized(
                self.client
                    .post(format!("{}/rest/v1/history", self.url))
                    .query(&[("on_conflict", "user_id,slug")])
                    .header("Prefer", "resolution=merge-duplicates"),
            )?
            .json(rows)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(CloudRepositoryError::Status(res.status().as_u16()));
        }

        Ok(())
    }

    async fn fetch_history(
        &self,
        user_id: &str,
    ) -> Result<Vec<CloudHistoryRow>, CloudRepositoryError> {
        let user_filter = format!("eq.{user_id}");
        let res = self
            .authorized(
                self.client
                    .get(format!("{}/rest/v1/history", self.url))
                    .query(&[
                        ("select", "*"),
                        ("user_id", user_filter.as_str()),
                        ("order", "updated_at.desc"),
                    ]),
            )?
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(CloudRepositoryError::Status(res.status().as_u16()));
        }

        Ok(res.json().await?)
    }

    fn login_url(&self, redirect_to: &str) -> String {
        let base = format!("{}/auth/v1/authorize", self.url);
        match Url::parse_with_params(
            &base,
            &[("provider", "google"), ("redirect_to", redirect_to)],
        ) {
            Ok(url) => url.to_string(),
            Err(_) => base,
        }
    }

    async fn sign_out(&self) -> Result<(), CloudRepositoryError> {
        let result = match self.authorized(self.client.post(format!("{}/auth/v1/logout", self.url)))
        {
            Ok(req) => req.send().await.map(|_| ()).map_err(CloudRepositoryError::from),
            Err(e) => Err(e),
        };

        *self
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;

        result
    }
}
