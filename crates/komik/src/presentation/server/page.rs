use std::sync::Arc;

use axum::{
    extract::{Extension, Form, Query},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, Redirect},
};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    application::{ClientController, RenderOutcome},
    presentation::{route::Route, surface::HtmlSurface},
};

/// Page interactions carried in the query string
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Chapter list filter
    pub q: Option<String>,
    /// `full` shows the whole synopsis
    pub synopsis: Option<String>,
}

/// Server side rendering through a single controller, one page at a time
pub struct PageRenderer {
    controller: ClientController<HtmlSurface>,
    lock: Mutex<()>,
}

impl PageRenderer {
    pub fn new(controller: ClientController<HtmlSurface>) -> Self {
        Self {
            controller,
            lock: Mutex::new(()),
        }
    }

    pub async fn render(&self, location: &str, query: &PageQuery) -> String {
        let _guard = self.lock.lock().await;
        let outcome = self.controller.handle_location(location).await;
        debug!("rendered {location}: {outcome:?}");

        if outcome == RenderOutcome::Rendered {
            if let Some(filter) = query.q.as_deref().filter(|q| !q.trim().is_empty()) {
                self.controller.filter_chapters(filter);
            }
            if query.synopsis.as_deref() == Some("full") {
                self.controller.toggle_synopsis();
            }
        }

        self.controller.with_surface(HtmlSurface::page)
    }
}

pub async fn page(
    uri: Uri,
    Query(query): Query<PageQuery>,
    Extension(renderer): Extension<Arc<PageRenderer>>,
) -> Html<String> {
    let location = uri
        .path_and_query()
        .map(|path| path.as_str())
        .unwrap_or("/");

    Html(renderer.render(location, &query).await)
}

#[derive(Debug, Deserialize)]
pub struct BookmarkForm {
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
}

/// Path and query of the referring page, never another origin
fn referer_path(headers: &HeaderMap) -> Option<String> {
    let referer: Uri = headers.get(header::REFERER)?.to_str().ok()?.parse().ok()?;
    referer
        .path_and_query()
        .map(|path| path.as_str().to_string())
}

pub async fn toggle_bookmark(
    headers: HeaderMap,
    Extension(renderer): Extension<Arc<PageRenderer>>,
    Form(form): Form<BookmarkForm>,
) -> Result<Redirect, StatusCode> {
    {
        let _guard = renderer.lock.lock().await;
        renderer
            .controller
            .toggle_bookmark(&form.slug, &form.title, &form.image)
            .map_err(|e| {
                error!("failed to toggle bookmark {}: {e}", form.slug);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
    }

    let back = referer_path(&headers).unwrap_or_else(|| Route::Series(form.slug).url());
    Ok(Redirect::to(&back))
}

pub async fn logout(Extension(renderer): Extension<Arc<PageRenderer>>) -> Redirect {
    let _guard = renderer.lock.lock().await;
    renderer.controller.logout().await;

    Redirect::to(&Route::Home.url())
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_referer_path() {
        let mut headers = HeaderMap::new();
        assert_eq!(referer_path(&headers), None);

        headers.insert(
            header::REFERER,
            HeaderValue::from_static("https://evil.example/series/x?q=1"),
        );
        assert_eq!(referer_path(&headers).as_deref(), Some("/series/x?q=1"));
    }
}
