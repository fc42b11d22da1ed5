use async_trait::async_trait;
use komik_lib::models::{SlugKind, SlugMapping};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MappingRepositoryError {
    #[error("database error: {0}")]
    DbError(#[from] sqlx::Error),
    #[error("invalid slug type: {0}")]
    InvalidKind(String),
}

#[async_trait]
pub trait MappingRepository: Send + Sync {
    async fn get_id(
        &self,
        slug: &str,
        kind: SlugKind,
    ) -> Result<Option<String>, MappingRepositoryError>;

    /// Inserts a mapping, keeping the existing one if (slug, kind) is taken
    async fn insert_mapping(
        &self,
        uuid: &str,
        slug: &str,
        kind: SlugKind,
    ) -> Result<(), MappingRepositoryError>;

    async fn get_slug(&self, uuid: &str) -> Result<Option<SlugMapping>, MappingRepositoryError>;
}
