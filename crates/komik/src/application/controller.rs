use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use anyhow::anyhow;
use komik_lib::{
    is_opaque_id,
    models::{CloudUser, HistoryEntry, ListPage, SlugKind},
};

use super::{
    carousel::Carousel,
    state::AppState,
    token::{NavigationToken, NavigationTokens},
};
use crate::{
    domain::{
        repositories::{
            catalogue::CatalogueRepository, cloud::CloudRepository, resolver::IdResolver,
            storage::KeyValueStorage,
        },
        services::{
            library::{HistorySource, LibraryError, LibraryService},
            sync::SyncService,
        },
    },
    presentation::{
        navigation::NavigationHistory,
        render,
        route::Route,
        surface::Surface,
        view::{
            home::sort_genres, Card, DetailView, ErrorView, GridView, HomeView, IdentityView,
            ReaderEvent, ReaderState, ReaderView,
        },
    },
};

#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub hero_count: usize,
    pub latest_count: usize,
    pub carousel_interval: Duration,
    /// Auto-advance the hero slides. Off when every render is a one-shot
    /// page for a request.
    pub carousel: bool,
    /// Where the login flow sends the user back to
    pub origin: String,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            hero_count: 5,
            latest_count: 12,
            carousel_interval: Duration::from_secs(5),
            carousel: true,
            origin: "http://127.0.0.1:8080".to_string(),
        }
    }
}

/// How a navigation finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,
    /// The error view with a retry link was shown
    Failed,
    /// A newer navigation took over, nothing was written
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UrlUpdate {
    None,
    Push,
    Replace,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn commit_to<S: Surface>(surface: &Mutex<S>, token: &NavigationToken, html: String) -> bool {
    let mut surface = lock(surface);
    if !token.is_current() {
        debug!("discarding stale render of navigation {}", token.generation());
        return false;
    }
    surface.replace_content(html);

    true
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub struct ControllerBuilder {
    catalogue: Option<Arc<dyn CatalogueRepository>>,
    resolver: Option<Arc<dyn IdResolver>>,
    storage: Option<Arc<dyn KeyValueStorage>>,
    cloud: Option<Arc<dyn CloudRepository>>,
    options: ViewOptions,
}

impl Default for ControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerBuilder {
    pub fn new() -> Self {
        Self {
            catalogue: None,
            resolver: None,
            storage: None,
            cloud: None,
            options: ViewOptions::default(),
        }
    }

    pub fn with_catalogue(self, catalogue: Arc<dyn CatalogueRepository>) -> Self {
        Self {
            catalogue: Some(catalogue),
            ..self
        }
    }

    pub fn with_resolver(self, resolver: Arc<dyn IdResolver>) -> Self {
        Self {
            resolver: Some(resolver),
            ..self
        }
    }

    pub fn with_storage(self, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage: Some(storage),
            ..self
        }
    }

    pub fn with_cloud(self, cloud: Arc<dyn CloudRepository>) -> Self {
        Self {
            cloud: Some(cloud),
            ..self
        }
    }

    pub fn with_options(self, options: ViewOptions) -> Self {
        Self { options, ..self }
    }

    pub fn build<S: Surface>(self, surface: S) -> Result<ClientController<S>, anyhow::Error> {
        let catalogue = self.catalogue.ok_or_else(|| anyhow!("no catalogue"))?;
        let resolver = self.resolver.ok_or_else(|| anyhow!("no id resolver"))?;
        let storage = self.storage.ok_or_else(|| anyhow!("no storage"))?;

        let sync = Arc::new(SyncService::new(self.cloud));
        let library = Arc::new(LibraryService::new(storage, sync.clone()));

        Ok(ClientController {
            catalogue,
            resolver,
            library,
            sync,
            surface: Arc::new(Mutex::new(surface)),
            navigation: Mutex::new(NavigationHistory::default()),
            tokens: NavigationTokens::new(),
            state: Mutex::new(AppState::default()),
            options: self.options,
        })
    }
}

/// Routes navigations to views and owns the application state. One view
/// render runs per navigation; renders superseded mid-flight are dropped.
pub struct ClientController<S: Surface> {
    catalogue: Arc<dyn CatalogueRepository>,
    resolver: Arc<dyn IdResolver>,
    library: Arc<LibraryService>,
    sync: Arc<SyncService>,
    surface: Arc<Mutex<S>>,
    navigation: Mutex<NavigationHistory>,
    tokens: NavigationTokens,
    state: Mutex<AppState>,
    options: ViewOptions,
}

impl<S: Surface> ClientController<S> {
    pub fn library(&self) -> &LibraryService {
        &self.library
    }

    pub fn sync(&self) -> &SyncService {
        &self.sync
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&lock(&self.surface))
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&lock(&self.state))
    }

    pub fn current_location(&self) -> String {
        lock(&self.navigation).current().to_string()
    }

    pub fn reader_state(&self) -> ReaderState {
        lock(&self.state).reader_state
    }

    /// First load: genres, session, then the view for `location`
    pub async fn start(&self, location: &str) -> RenderOutcome {
        lock(&self.navigation).replace(location);

        self.load_genres().await;
        self.check_auth_status().await;
        self.handle_location(location).await
    }

    pub async fn load_genres(&self) {
        match self.catalogue.fetch_genres().await {
            Some(mut genres) => {
                sort_genres(&mut genres);
                lock(&self.state).genres = genres;
            }
            None => warn!("genres unavailable"),
        }
    }

    pub async fn check_auth_status(&self) -> Option<CloudUser> {
        let local = self.library.local_history();
        let user = self.sync.check_auth_status(&local).await;
        if let Some(user) = &user {
            info!("signed in as {}", user.display_name());
        }

        lock(&self.state).current_user = user.clone();
        self.render_identity();

        user
    }

    fn render_identity(&self) {
        let user = lock(&self.state).current_user.clone();
        let view = IdentityView::new(user.as_ref(), self.sync.login_url(&self.options.origin));

        lock(&self.surface).replace_identity(render::identity(&view));
    }

    /// Renders `location` without touching the session history, for the
    /// initial load and back/forward
    pub async fn handle_location(&self, location: &str) -> RenderOutcome {
        self.dispatch(Route::parse(location), UrlUpdate::None).await
    }

    pub async fn navigate(&self, route: Route) -> RenderOutcome {
        self.dispatch(route, UrlUpdate::Push).await
    }

    pub async fn back(&self) -> Option<RenderOutcome> {
        let location = lock(&self.navigation).back()?.to_string();
        Some(self.handle_location(&location).await)
    }

    pub async fn forward(&self) -> Option<RenderOutcome> {
        let location = lock(&self.navigation).forward()?.to_string();
        Some(self.handle_location(&location).await)
    }

    pub async fn reload(&self) -> RenderOutcome {
        let location = self.current_location();
        self.handle_location(&location).await
    }

    /// Re-renders the current list on another page, replacing the current
    /// history entry
    pub async fn go_to_page(&self, page: u32) -> Option<RenderOutcome> {
        let route = Route::parse(&self.current_location()).with_page(page)?;
        Some(self.dispatch(route, UrlUpdate::Replace).await)
    }

    pub async fn search(&self, query: &str) -> Option<RenderOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        Some(
            self.navigate(Route::Search {
                query: query.to_string(),
                page: 1,
            })
            .await,
        )
    }

    async fn dispatch(&self, route: Route, update: UrlUpdate) -> RenderOutcome {
        let token = self.tokens.begin();
        lock(&self.state).teardown(&route);
        lock(&self.surface).scroll_to_top();
        info!("navigate to {}", route.url());

        match route {
            Route::Home => self.show_home(&token, update).await,
            Route::Series(id) => self.show_detail(&token, &id, update).await,
            Route::Chapter { id, series } => {
                self.read_chapter(&token, &id, series.as_deref(), update)
                    .await
            }
            Route::History => self.show_history(&token, update).await,
            Route::Bookmarks => self.show_bookmarks(&token, update),
            list => self.show_list(&token, list, update).await,
        }
    }

    fn commit(&self, token: &NavigationToken, html: String) -> bool {
        commit_to(&self.surface, token, html)
    }

    fn fail(&self, token: &NavigationToken, message: &str, retry: Route) -> RenderOutcome {
        warn!("{message} ({})", retry.url());
        if self.commit(token, render::error(&ErrorView::new(message, retry))) {
            RenderOutcome::Failed
        } else {
            RenderOutcome::Discarded
        }
    }

    fn update_url(&self, token: &NavigationToken, update: UrlUpdate, location: &str) {
        if !token.is_current() {
            return;
        }

        let mut navigation = lock(&self.navigation);
        match update {
            UrlUpdate::Push => {
                navigation.push(location);
            }
            UrlUpdate::Replace => navigation.replace(location),
            UrlUpdate::None => {}
        }
    }

    fn record(&self, entry: HistoryEntry) {
        if let Err(e) = self.library.record_history(entry) {
            warn!("failed to record history: {e}");
        }
    }

    /// Slug behind an opaque id, or the input itself
    async fn resolve_slug(&self, input: &str) -> String {
        if !is_opaque_id(input) {
            return input.to_string();
        }

        match self.resolver.resolve_slug(input).await {
            Some(mapping) => mapping.slug,
            None => input.to_string(),
        }
    }

    async fn show_home(&self, token: &NavigationToken, update: UrlUpdate) -> RenderOutcome {
        self.commit(token, render::loading());
        self.update_url(token, update, &Route::Home.url());

        let Some(data) = self.catalogue.fetch_home().await else {
            return self.fail(token, "Failed to load the home page.", Route::Home);
        };

        let view = {
            let state = lock(&self.state);
            HomeView::new(
                &data,
                self.options.hero_count,
                self.options.latest_count,
                &state.genres,
            )
        };

        let mut state = lock(&self.state);
        if !self.commit(token, render::home(&view)) {
            return RenderOutcome::Discarded;
        }

        if self.options.carousel && view.hero.len() > 1 {
            let surface = self.surface.clone();
            let tick_token = token.clone();
            let slides = view.clone();
            state.carousel = Some(Carousel::start(
                view.hero.len(),
                self.options.carousel_interval,
                move |index| {
                    commit_to(&surface, &tick_token, render::home(&slides.with_active(index)));
                },
            ));
        }
        state.home = Some(view);

        RenderOutcome::Rendered
    }

    async fn show_detail(
        &self,
        token: &NavigationToken,
        id: &str,
        update: UrlUpdate,
    ) -> RenderOutcome {
        self.commit(token, render::loading());

        let slug = self.resolve_slug(id).await;
        if update != UrlUpdate::None {
            let id = self.resolver.resolve_id(&slug, SlugKind::Series).await;
            self.update_url(token, update, &Route::Series(id).url());
        }

        let Some(detail) = self.catalogue.fetch_detail(&slug).await else {
            return self.fail(
                token,
                "Failed to load series details.",
                Route::Series(id.to_string()),
            );
        };

        let saved = self.library.find_history(&slug);
        let view = DetailView::new(
            &slug,
            &detail,
            saved.as_ref(),
            self.library.is_bookmarked(&slug),
        );

        {
            let mut state = lock(&self.state);
            if !self.commit(token, render::detail(&view)) {
                return RenderOutcome::Discarded;
            }
            state.current_chapter_list = detail.chapters.clone();
            state.detail = Some(view);
        }

        self.record(HistoryEntry::series(
            &slug,
            &detail.title,
            &detail.image,
            now_millis(),
        ));

        RenderOutcome::Rendered
    }

    fn reader_event(&self, token: &NavigationToken, event: ReaderEvent) {
        if !token.is_current() {
            return;
        }

        let mut state = lock(&self.state);
        let next = state.reader_state.on(event);
        if next != state.reader_state {
            debug!("reader {:?} -> {:?}", state.reader_state, next);
            state.reader_state = next;
        }
    }

    async fn read_chapter(
        &self,
        token: &NavigationToken,
        id: &str,
        series: Option<&str>,
        update: UrlUpdate,
    ) -> RenderOutcome {
        self.reader_event(token, ReaderEvent::Open);
        self.commit(token, render::reader_shell());

        let chapter_slug = self.resolve_slug(id).await;
        if update != UrlUpdate::None {
            let id = self.resolver.resolve_id(&chapter_slug, SlugKind::Chapter).await;
            let route = Route::Chapter {
                id,
                series: series.map(str::to_string),
            };
            self.update_url(token, update, &route.url());
        }

        let Some(chapter) = self.catalogue.fetch_chapter(&chapter_slug).await else {
            self.reader_event(token, ReaderEvent::Fetched(false));
            let outcome = self.fail(
                token,
                "Failed to load chapter.",
                Route::Chapter {
                    id: id.to_string(),
                    series: series.map(str::to_string),
                },
            );
            self.reader_event(token, ReaderEvent::Rendered { pending: false });
            return outcome;
        };
        self.reader_event(token, ReaderEvent::Fetched(true));

        let view = {
            let mut state = lock(&self.state);
            let view = ReaderView::new(&chapter_slug, series, &chapter, &state.current_chapter_list);
            if !self.commit(token, render::reader(&view)) {
                return RenderOutcome::Discarded;
            }
            state.reader_state = state.reader_state.on(ReaderEvent::Rendered {
                pending: !view.is_settled(),
            });
            state.reader = Some(view.clone());
            view
        };

        match &view.series_slug {
            Some(series_slug) => self.record(HistoryEntry::chapter(
                series_slug,
                &chapter_slug,
                &view.title,
                now_millis(),
            )),
            None => debug!("no series for {chapter_slug}, history not recorded"),
        }

        RenderOutcome::Rendered
    }

    async fn fetch_page(&self, route: &Route) -> Option<(String, Option<ListPage>)> {
        let page = route.page()?;
        let fetched = match route {
            Route::Ongoing(_) => (
                "Ongoing".to_string(),
                self.catalogue.fetch_list("Ongoing", "update", page).await,
            ),
            Route::Completed(_) => (
                "Completed".to_string(),
                self.catalogue.fetch_list("Completed", "update", page).await,
            ),
            Route::Genre { slug, .. } => {
                let title = lock(&self.state)
                    .genres
                    .iter()
                    .find(|genre| &genre.slug == slug)
                    .map(|genre| genre.title.clone())
                    .unwrap_or_else(|| slug.clone());
                (title, self.catalogue.fetch_genre(slug, page).await)
            }
            Route::Search { query, .. } => (
                format!("Search: {query}"),
                self.catalogue.fetch_search(query, page).await,
            ),
            _ => return None,
        };

        Some(fetched)
    }

    async fn show_list(
        &self,
        token: &NavigationToken,
        route: Route,
        update: UrlUpdate,
    ) -> RenderOutcome {
        self.commit(token, render::loading());
        self.update_url(token, update, &route.url());

        let Some((title, fetched)) = self.fetch_page(&route).await else {
            return self.fail(token, "Page not found.", Route::Home);
        };
        let Some(list) = fetched else {
            return self.fail(token, &format!("Failed to load {title}."), route);
        };

        let view = GridView::from_page(&title, &route, &list);
        if self.commit(token, render::grid(&view)) {
            RenderOutcome::Rendered
        } else {
            RenderOutcome::Discarded
        }
    }

    async fn show_history(&self, token: &NavigationToken, update: UrlUpdate) -> RenderOutcome {
        self.commit(token, render::loading());
        self.update_url(token, update, &Route::History.url());

        let (entries, source) = self.library.list_history().await;
        let title = match source {
            HistorySource::Cloud => "Reading History (Cloud)",
            HistorySource::Local => "Reading History",
        };

        let view = GridView::new(title, entries.iter().map(Card::from).collect());
        if self.commit(token, render::grid(&view)) {
            RenderOutcome::Rendered
        } else {
            RenderOutcome::Discarded
        }
    }

    fn show_bookmarks(&self, token: &NavigationToken, update: UrlUpdate) -> RenderOutcome {
        self.update_url(token, update, &Route::Bookmarks.url());

        let bookmarks = self.library.list_bookmarks();
        let view = GridView::new("Bookmarks", bookmarks.iter().map(Card::from).collect());
        if self.commit(token, render::grid(&view)) {
            RenderOutcome::Rendered
        } else {
            RenderOutcome::Discarded
        }
    }

    fn update_detail(&self, change: impl FnOnce(&mut DetailView)) -> bool {
        let mut state = lock(&self.state);
        let Some(view) = state.detail.as_mut() else {
            return false;
        };
        change(view);

        lock(&self.surface).replace_content(render::detail(view));
        true
    }

    /// Toggles the bookmark and refreshes the button if that series is shown
    pub fn toggle_bookmark(
        &self,
        slug: &str,
        title: &str,
        image: &str,
    ) -> Result<bool, LibraryError> {
        let bookmarked = self.library.toggle_bookmark(slug, title, image)?;
        info!("bookmark {slug}: {bookmarked}");

        let showing = lock(&self.state)
            .detail
            .as_ref()
            .is_some_and(|view| view.slug == slug);
        if showing {
            self.update_detail(|view| view.bookmarked = bookmarked);
        }

        Ok(bookmarked)
    }

    pub fn filter_chapters(&self, query: &str) -> bool {
        self.update_detail(|view| view.chapter_filter = query.to_string())
    }

    pub fn toggle_synopsis(&self) -> bool {
        self.update_detail(|view| view.synopsis_expanded = !view.synopsis_expanded)
    }

    fn update_reader(&self, change: impl FnOnce(&mut ReaderView) -> bool) -> bool {
        let mut state = lock(&self.state);
        let Some(view) = state.reader.as_mut() else {
            return false;
        };
        if !change(view) {
            return false;
        }

        let event = if view.is_settled() {
            ReaderEvent::ImagesSettled
        } else {
            ReaderEvent::Retry
        };
        let html = render::reader(view);
        state.reader_state = state.reader_state.on(event);

        lock(&self.surface).replace_content(html);
        true
    }

    pub fn image_loaded(&self, index: usize) -> bool {
        self.update_reader(|view| view.image_loaded(index))
    }

    pub fn image_failed(&self, index: usize) -> bool {
        self.update_reader(|view| view.image_failed(index))
    }

    pub fn retry_image(&self, index: usize) -> bool {
        self.update_reader(|view| view.retry_image(index))
    }

    pub fn login_url(&self) -> Option<String> {
        self.sync.login_url(&self.options.origin)
    }

    pub async fn logout(&self) -> RenderOutcome {
        self.sync.logout().await;
        lock(&self.state).current_user = None;
        self.render_identity();

        self.reload().await
    }
}
