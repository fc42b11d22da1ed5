use async_trait::async_trait;
use komik_lib::models::{SlugKind, SlugMapping};
use sqlx::{Row, SqlitePool};

use crate::{
    domain::repositories::mapping::{MappingRepository, MappingRepositoryError},
    infrastructure::database::Pool,
};

#[derive(Clone)]
pub struct MappingRepositoryImpl {
    pool: Pool,
}

impl MappingRepositoryImpl {
    pub fn new<P: Into<Pool>>(pool: P) -> Self {
        Self { pool: pool.into() }
    }
}

#[async_trait]
impl MappingRepository for MappingRepositoryImpl {
    async fn get_id(
        &self,
        slug: &str,
        kind: SlugKind,
    ) -> Result<Option<String>, MappingRepositoryError> {
        let row = sqlx::query(r#"SELECT uuid FROM slug_mapping WHERE slug = ? AND type = ?"#)
            .bind(slug)
            .bind(kind.as_str())
            .fetch_optional(&self.pool as &SqlitePool)
            .await?;

        Ok(row.map(|row| row.get(0)))
    }

    async fn insert_mapping(
        &self,
        uuid: &str,
        slug: &str,
        kind: SlugKind,
    ) -> Result<(), MappingRepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO slug_mapping(uuid, slug, type)
            VALUES (?, ?, ?)
            ON CONFLICT(slug, type) DO NOTHING"#,
        )
        .bind(uuid)
        .bind(slug)
        .bind(kind.as_str())
        .execute(&self.pool as &SqlitePool)
        .await?;

        Ok(())
    }

    async fn get_slug(&self, uuid: &str) -> Result<Option<SlugMapping>, MappingRepositoryError> {
        let row = sqlx::query(r#"SELECT slug, type FROM slug_mapping WHERE uuid = ?"#)
            .bind(uuid)
            .fetch_optional(&self.pool as &SqlitePool)
            .await?;

        match row {
            Some(row) => {
                let kind: String = row.get(1);
                Ok(Some(SlugMapping {
                    slug: row.get(0),
                    kind: kind.parse().map_err(MappingRepositoryError::InvalidKind)?,
                }))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        domain::services::mapping::MappingService,
        infrastructure::database::establish_memory_connection,
    };

    #[tokio::test]
    async fn test_stable_id_and_round_trip() {
        let pool = establish_memory_connection().await.unwrap();
        let svc = MappingService::new(MappingRepositoryImpl::new(pool));

        let id = svc
            .get_or_create_id("one-piece", SlugKind::Series)
            .await
            .unwrap();
        let again = svc
            .get_or_create_id("one-piece", SlugKind::Series)
            .await
            .unwrap();
        let chapter = svc
            .get_or_create_id("one-piece", SlugKind::Chapter)
            .await
            .unwrap();

        assert_eq!(id.len(), komik_lib::OPAQUE_ID_LEN);
        assert_eq!(id, again);
        assert_ne!(id, chapter);
        assert_eq!(
            svc.get_slug(&id).await.unwrap(),
            Some(SlugMapping {
                slug: "one-piece".to_string(),
                kind: SlugKind::Series,
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_uuid() {
        let pool = establish_memory_connection().await.unwrap();
        let repo = MappingRepositoryImpl::new(pool);

        assert_eq!(
            repo.get_slug("00000000-0000-0000-0000-000000000000")
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_insert_keeps_existing() {
        let pool = establish_memory_connection().await.unwrap();
        let repo = MappingRepositoryImpl::new(pool);

        repo.insert_mapping("first", "a", SlugKind::Series).await.unwrap();
        repo.insert_mapping("second", "a", SlugKind::Series).await.unwrap();

        assert_eq!(
            repo.get_id("a", SlugKind::Series).await.unwrap().as_deref(),
            Some("first")
        );
    }
}
