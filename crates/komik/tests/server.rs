#![cfg(feature = "server")]

mod common;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use common::{from_json, one_piece, FakeCatalogue, FakeResolver};
use komik::{
    application::{ControllerBuilder, RenderOutcome, ViewOptions},
    domain::{
        repositories::{catalogue::CatalogueRepository, resolver::IdResolver},
        services::mapping::MappingService,
    },
    infrastructure::{
        database, proxy::ProxyCatalogue, repositories::mapping::MappingRepositoryImpl,
        resolver::HttpIdResolver, storage::MemoryStorage,
    },
    presentation::{route::Route, surface::HtmlSurface, ServerBuilder},
};
use komik_lib::models::{SlugKind, SlugMapping};
use serde_json::json;

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await });

    format!("http://{addr}")
}

/// Mapping backend on an ephemeral port, returns its base url
async fn spawn_backend() -> String {
    let pool = database::establish_memory_connection().await.unwrap();
    let server = ServerBuilder::new()
        .with_mapping_svc(MappingService::new(MappingRepositoryImpl::new(pool)))
        .build()
        .unwrap();

    spawn(server.router()).await
}

/// Backend plus page renderer over the given catalogue
async fn spawn_app(catalogue: FakeCatalogue) -> String {
    let pool = database::establish_memory_connection().await.unwrap();
    let controller = ControllerBuilder::new()
        .with_catalogue(Arc::new(catalogue))
        .with_resolver(Arc::new(FakeResolver::default()))
        .with_storage(Arc::new(MemoryStorage::new()))
        .with_options(ViewOptions {
            carousel: false,
            ..Default::default()
        })
        .build(HtmlSurface::new())
        .unwrap();
    let server = ServerBuilder::new()
        .with_mapping_svc(MappingService::new(MappingRepositoryImpl::new(pool)))
        .with_controller(controller)
        .build()
        .unwrap();

    spawn(server.router()).await
}

/// Stands in for the CORS proxy, answering by the last segment of the target
async fn stub_proxy(Query(params): Query<HashMap<String, String>>) -> Response {
    let target = params.get("url").cloned().unwrap_or_default();
    match target.rsplit('/').next().unwrap_or_default() {
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "upstream down").into_response(),
        "html" => Html("<html><body>Just a moment...</body></html>").into_response(),
        "refused" => Json(json!({ "success": false, "result": null })).into_response(),
        _ => Json(json!({
            "success": true,
            "result": {
                "content": {
                    "data": {
                        "title": "One Piece",
                        "image": null,
                        "genres": null,
                        "chapters": [
                            { "slug": "ch-2", "title": "Chapter 2" },
                            { "slug": "ch-1", "title": null }
                        ]
                    }
                }
            }
        }))
        .into_response(),
    }
}

fn proxy_catalogue(proxy: &str) -> ProxyCatalogue {
    ProxyCatalogue::new(proxy, "https://comics.local/comic/komikcast").unwrap()
}

#[tokio::test]
async fn test_health() {
    let backend = spawn_backend().await;

    let body = reqwest::get(format!("{backend}/health"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_ids_are_stable_and_round_trip() {
    let resolver = HttpIdResolver::new(&spawn_backend().await);

    let id = resolver.resolve_id("one-piece", SlugKind::Series).await;
    assert_eq!(id.len(), 36);
    assert_eq!(resolver.resolve_id("one-piece", SlugKind::Series).await, id);
    assert_ne!(resolver.resolve_id("one-piece", SlugKind::Chapter).await, id);

    assert_eq!(
        resolver.resolve_slug(&id).await,
        Some(SlugMapping {
            slug: "one-piece".to_string(),
            kind: SlugKind::Series,
        })
    );
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let backend = spawn_backend().await;
    let id = "0b6d2f4e-8d7a-4c1e-9a7f-3f7c2d9e1b11";

    let res = reqwest::get(format!("{backend}/api/get-slug/{id}"))
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

    assert_eq!(HttpIdResolver::new(&backend).resolve_slug(id).await, None);
}

#[tokio::test]
async fn test_resolver_falls_back_without_backend() {
    let resolver = HttpIdResolver::new("http://127.0.0.1:9");

    assert_eq!(
        resolver.resolve_id("one-piece", SlugKind::Series).await,
        "one-piece"
    );
    assert_eq!(resolver.resolve_slug("one-piece").await, None);
}

#[tokio::test]
async fn test_detail_through_backend() {
    let backend = spawn_backend().await;
    let catalogue = Arc::new(FakeCatalogue::default().with_detail("one-piece", one_piece()));
    let controller = ControllerBuilder::new()
        .with_catalogue(catalogue.clone())
        .with_resolver(Arc::new(HttpIdResolver::new(&backend)))
        .with_storage(Arc::new(MemoryStorage::new()))
        .build(HtmlSurface::new())
        .unwrap();

    let unknown = "0b6d2f4e-8d7a-4c1e-9a7f-3f7c2d9e1b11";
    assert_eq!(
        controller
            .handle_location(&format!("/series/{unknown}"))
            .await,
        RenderOutcome::Failed
    );
    assert_eq!(catalogue.calls(), vec![format!("detail/{unknown}")]);

    assert_eq!(
        controller
            .navigate(Route::Series("one-piece".to_string()))
            .await,
        RenderOutcome::Rendered
    );
    let location = controller.current_location();
    let id = location.trim_start_matches("/series/");
    assert_eq!(id.len(), 36);

    assert_eq!(controller.handle_location(&location).await, RenderOutcome::Rendered);
    assert_eq!(catalogue.calls().last().map(String::as_str), Some("detail/one-piece"));
}

#[tokio::test]
async fn test_proxy_failures_are_none() {
    let proxy = spawn(Router::new().route("/px", get(stub_proxy))).await;
    let catalogue = proxy_catalogue(&format!("{proxy}/px"));

    for slug in ["broken", "html", "refused"] {
        assert!(catalogue.fetch_detail(slug).await.is_none(), "{slug}");
    }

    let unreachable = proxy_catalogue("http://127.0.0.1:9/px");
    assert!(unreachable.fetch_detail("one-piece").await.is_none());
}

#[tokio::test]
async fn test_proxy_decodes_detail() {
    let proxy = spawn(Router::new().route("/px", get(stub_proxy))).await;
    let catalogue = proxy_catalogue(&format!("{proxy}/px"));

    let detail = catalogue.fetch_detail("one-piece").await.unwrap();

    assert_eq!(detail.title, "One Piece");
    assert_eq!(detail.image, "");
    assert!(detail.genres.is_empty());
    assert_eq!(detail.earliest_chapter().unwrap().slug, "ch-1");
}

#[tokio::test]
async fn test_page_controls_work_without_script() {
    let mut detail = one_piece();
    detail.synopsis = Some("y".repeat(320));
    let app = spawn_app(
        FakeCatalogue::default()
            .with_detail("one-piece", detail)
            .with_chapter("ch-1", from_json(json!({ "images": ["p1.jpg"] }))),
    )
    .await;
    let client = reqwest::Client::new();
    let get = |path: &str| {
        let client = client.clone();
        let url = format!("{app}{path}");
        async move { client.get(url).send().await.unwrap().text().await.unwrap() }
    };

    let filtered = get("/series/one-piece?q=chapter+2").await;
    assert!(filtered.contains(">Chapter 2</a>"));
    assert!(!filtered.contains(">Chapter 1</a>"));
    assert!(filtered.contains(r#"<form class="chapter-search" method="get">"#));

    let expanded = get("/series/one-piece?synopsis=full").await;
    assert!(expanded.contains(&"y".repeat(320)));
    assert!(expanded.contains("Show less"));

    let res = client
        .post(format!("{app}/api/bookmark"))
        .header(reqwest::header::REFERER, format!("{app}/series/one-piece"))
        .form(&[("slug", "one-piece"), ("title", "One Piece"), ("image", "op.jpg")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.url().path(), "/series/one-piece");
    assert!(res.text().await.unwrap().contains("bookmark active"));

    let reader = get("/chapter?id=ch-1&series=one-piece").await;
    assert!(reader.contains(r#"<form class="jump" method="get" action="/chapter">"#));
    assert!(reader.contains(r#"<option value="ch-1" selected>Chapter 1</option>"#));
    assert!(reader.contains(r#"<input type="hidden" name="series" value="one-piece">"#));
    assert!(reader.contains(r#"src="p1.jpg""#));
    assert!(reader.contains("<script>"));

    let bookmarks = get("/bookmarks").await;
    assert!(bookmarks.contains(r#"href="/series/one-piece""#));

    let res = client.post(format!("{app}/logout")).send().await.unwrap();
    assert!(res.status().is_success());
    assert_eq!(res.url().path(), "/");
}
