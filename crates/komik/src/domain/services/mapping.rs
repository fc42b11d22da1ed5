use komik_lib::models::{SlugKind, SlugMapping};
use thiserror::Error;

use crate::domain::repositories::mapping::{MappingRepository, MappingRepositoryError};

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("repository error: {0}")]
    RepositoryError(#[from] MappingRepositoryError),
    #[error("mapping vanished after insert")]
    Vanished,
}

/// Hands out stable opaque ids for slugs
pub struct MappingService<R>
where
    R: MappingRepository,
{
    repo: R,
}

impl<R> MappingService<R>
where
    R: MappingRepository,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn get_or_create_id(&self, slug: &str, kind: SlugKind) -> Result<String, MappingError> {
        if let Some(uuid) = self.repo.get_id(slug, kind).await? {
            return Ok(uuid);
        }

        let uuid = uuid::Uuid::new_v4().to_string();
        self.repo.insert_mapping(&uuid, slug, kind).await?;

        // a concurrent insert for the same slug wins, read back whichever stuck
        self.repo
            .get_id(slug, kind)
            .await?
            .ok_or(MappingError::Vanished)
    }

    pub async fn get_slug(&self, uuid: &str) -> Result<Option<SlugMapping>, MappingError> {
        Ok(self.repo.get_slug(uuid).await?)
    }
}
