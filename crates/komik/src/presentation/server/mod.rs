pub mod health;
pub mod mapping;
pub mod page;

use std::{net::SocketAddr, sync::Arc};

use anyhow::anyhow;
use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};

use self::{health::health_check, mapping::MappingSvc, page::PageRenderer};
use crate::{
    application::ClientController,
    domain::services::mapping::MappingService,
    infrastructure::repositories::mapping::MappingRepositoryImpl,
    presentation::surface::HtmlSurface,
};

#[derive(Default)]
pub struct ServerBuilder {
    mapping_svc: Option<MappingService<MappingRepositoryImpl>>,
    controller: Option<ClientController<HtmlSurface>>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping_svc(self, mapping_svc: MappingService<MappingRepositoryImpl>) -> Self {
        Self {
            mapping_svc: Some(mapping_svc),
            ..self
        }
    }

    /// Serves rendered pages for every path the api does not claim
    pub fn with_controller(self, controller: ClientController<HtmlSurface>) -> Self {
        Self {
            controller: Some(controller),
            ..self
        }
    }

    pub fn build(self) -> Result<Server, anyhow::Error> {
        let mapping_svc = self
            .mapping_svc
            .ok_or_else(|| anyhow!("no mapping service"))?;

        Ok(Server::new(
            Arc::new(mapping_svc),
            self.controller.map(|controller| Arc::new(PageRenderer::new(controller))),
        ))
    }
}

pub struct Server {
    router: Router,
}

impl Server {
    pub fn new(mapping_svc: MappingSvc, renderer: Option<Arc<PageRenderer>>) -> Self {
        let mut router = Router::new()
            .route("/health", get(health_check))
            .route("/api/get-id", post(mapping::get_id))
            .route("/api/get-slug/{uuid}", get(mapping::get_slug));

        if let Some(renderer) = renderer {
            router = router
                .route("/api/bookmark", post(page::toggle_bookmark))
                .route("/logout", post(page::logout))
                .fallback(get(page::page))
                .layer(Extension(renderer));
        }

        router = router
            .layer(Extension(mapping_svc))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(CompressionLayer::new());

        Self { router }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn serve<A: Into<SocketAddr>>(self, addr: A) -> Result<(), anyhow::Error> {
        let listener = tokio::net::TcpListener::bind(addr.into()).await?;
        info!("listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
