use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use komik_lib::models::{IdRequest, IdResponse, SlugMapping};

use crate::{
    domain::services::mapping::MappingService,
    infrastructure::repositories::mapping::MappingRepositoryImpl,
};

pub type MappingSvc = Arc<MappingService<MappingRepositoryImpl>>;

pub async fn get_id(
    Extension(svc): Extension<MappingSvc>,
    Json(req): Json<IdRequest>,
) -> Result<Json<IdResponse>, StatusCode> {
    let uuid = svc
        .get_or_create_id(&req.slug, req.kind)
        .await
        .map_err(|e| {
            error!("failed to map {} {}: {e}", req.kind, req.slug);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(IdResponse { uuid }))
}

pub async fn get_slug(
    Path(uuid): Path<String>,
    Extension(svc): Extension<MappingSvc>,
) -> Result<Json<SlugMapping>, StatusCode> {
    match svc.get_slug(&uuid).await {
        Ok(Some(mapping)) => Ok(Json(mapping)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("failed to look up {uuid}: {e}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
