use async_trait::async_trait;
use komik_lib::models::{CloudHistoryRow, CloudUser};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CloudRepositoryError {
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("no session")]
    NoSession,
}

/// Per-user remote history table plus the session it is accessed with
#[async_trait]
pub trait CloudRepository: Send + Sync {
    async fn current_user(&self) -> Result<Option<CloudUser>, CloudRepositoryError>;

    async fn upsert_history(&self, rows: &[CloudHistoryRow]) -> Result<(), CloudRepositoryError>;

    /// Rows of a user, most recently updated first
    async fn fetch_history(&self, user_id: &str)
    -> Result<Vec<CloudHistoryRow>, CloudRepositoryError>;

    fn login_url(&self, redirect_to: &str) -> String;

    async fn sign_out(&self) -> Result<(), CloudRepositoryError>;
}
