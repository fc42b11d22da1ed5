use reqwest::Url;

const ORIGIN: &str = "http://komik.local";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    /// Opaque id or slug of a series
    Series(String),
    /// Opaque id or slug of a chapter, plus the series slug when known
    Chapter { id: String, series: Option<String> },
    Ongoing(u32),
    Completed(u32),
    Genre { slug: String, page: u32 },
    Search { query: String, page: u32 },
    History,
    Bookmarks,
}

impl Route {
    /// Parses a path with optional query. Anything unknown is home.
    pub fn parse(location: &str) -> Self {
        let Ok(url) = Url::parse(ORIGIN).and_then(|origin| origin.join(location)) else {
            return Route::Home;
        };

        let query = |name: &str| {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        };
        let page = query("page")
            .and_then(|page| page.parse::<u32>().ok())
            .filter(|page| *page > 0)
            .unwrap_or(1);

        let mut paths = url
            .path_segments()
            .map(|segments| segments.collect::<Vec<_>>())
            .unwrap_or_default();
        paths.retain(|path| !path.is_empty());

        match paths.as_slice() {
            ["series", id] => Route::Series(id.to_string()),
            ["chapter", id] => Route::Chapter {
                id: id.to_string(),
                series: query("series").filter(|series| !series.is_empty()),
            },
            ["chapter"] => match query("id").filter(|id| !id.is_empty()) {
                Some(id) => Route::Chapter {
                    id,
                    series: query("series").filter(|series| !series.is_empty()),
                },
                None => Route::Home,
            },
            ["ongoing"] => Route::Ongoing(page),
            ["completed"] => Route::Completed(page),
            ["genre", slug] => Route::Genre {
                slug: slug.to_string(),
                page,
            },
            ["search", query] => match decode_segment(query) {
                Some(query) if !query.trim().is_empty() => Route::Search { query, page },
                _ => Route::Home,
            },
            ["history"] => Route::History,
            ["bookmarks"] => Route::Bookmarks,
            _ => Route::Home,
        }
    }

    pub fn url(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Series(id) => format!("/series/{id}"),
            Route::Chapter { id, series: None } => format!("/chapter/{id}"),
            Route::Chapter {
                id,
                series: Some(series),
            } => with_query(&format!("/chapter/{id}"), &[("series", series)]),
            Route::Ongoing(page) => paged("/ongoing", *page, &[]),
            Route::Completed(page) => paged("/completed", *page, &[]),
            Route::Genre { slug, page } => paged(&format!("/genre/{slug}"), *page, &[]),
            Route::Search { query, page } => paged(&encode_path(&["search", query]), *page, &[]),
            Route::History => "/history".to_string(),
            Route::Bookmarks => "/bookmarks".to_string(),
        }
    }

    pub fn page(&self) -> Option<u32> {
        match self {
            Route::Ongoing(page)
            | Route::Completed(page)
            | Route::Genre { page, .. }
            | Route::Search { page, .. } => Some(*page),
            _ => None,
        }
    }

    /// The same list route on another page, `None` for routes without pages
    pub fn with_page(&self, page: u32) -> Option<Route> {
        let page = page.max(1);
        match self {
            Route::Ongoing(_) => Some(Route::Ongoing(page)),
            Route::Completed(_) => Some(Route::Completed(page)),
            Route::Genre { slug, .. } => Some(Route::Genre {
                slug: slug.clone(),
                page,
            }),
            Route::Search { query, .. } => Some(Route::Search {
                query: query.clone(),
                page,
            }),
            _ => None,
        }
    }
}

fn paged(path: &str, page: u32, pairs: &[(&str, &str)]) -> String {
    let page = page.to_string();
    let mut pairs = pairs.to_vec();
    if page != "1" {
        pairs.push(("page", &page));
    }

    with_query(path, &pairs)
}

fn encode_path(segments: &[&str]) -> String {
    let mut url = match Url::parse(ORIGIN) {
        Ok(url) => url,
        Err(_) => return format!("/{}", segments.join("/")),
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(segments);
    }
    url.path().to_string()
}

/// Percent-decodes a path segment by reading it back as a query value
fn decode_segment(segment: &str) -> Option<String> {
    let mut url = Url::parse(ORIGIN).ok()?;
    url.set_query(Some(&format!("v={}", segment.replace('+', "%2B").replace('&', "%26"))));
    url.query_pairs().next().map(|(_, value)| value.into_owned())
}

/// Query-only link (`?a=b`) that keeps the current path
pub(crate) fn relative_query(pairs: &[(&str, &str)]) -> String {
    match Url::parse_with_params(ORIGIN, pairs) {
        Ok(url) => format!("?{}", url.query().unwrap_or_default()),
        Err(_) => "?".to_string(),
    }
}

fn with_query(path: &str, pairs: &[(&str, &str)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }

    match Url::parse_with_params(&format!("{ORIGIN}{path}"), pairs) {
        Ok(url) => format!("{}?{}", url.path(), url.query().unwrap_or_default()),
        Err(_) => path.to_string(),
    }
}
