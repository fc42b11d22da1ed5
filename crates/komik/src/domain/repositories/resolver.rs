use async_trait::async_trait;
use komik_lib::models::{SlugKind, SlugMapping};

#[async_trait]
pub trait IdResolver: Send + Sync {
    /// Opaque id for a slug, or the slug itself when it cannot be resolved
    async fn resolve_id(&self, slug: &str, kind: SlugKind) -> String;

    async fn resolve_slug(&self, id: &str) -> Option<SlugMapping>;
}
