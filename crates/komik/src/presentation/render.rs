use std::fmt::Write;

use komik_lib::models::DEFAULT_IMAGE;

use super::route::{relative_query, Route};
use super::view::{
    card::Card,
    detail::DetailView,
    error::ErrorView,
    grid::GridView,
    home::HomeView,
    identity::IdentityView,
    reader::{ImageState, ReaderView},
};

/// Escapes text for use in element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn image_or_default(image: &str) -> String {
    if image.is_empty() {
        escape(DEFAULT_IMAGE)
    } else {
        escape(image)
    }
}

pub fn loading() -> String {
    r#"<div class="loading" role="status"><div class="spinner"></div></div>"#.to_string()
}

/// Placeholder shown while a chapter is fetched
pub fn reader_shell() -> String {
    let mut html = String::from(r#"<div class="reader reader-shell">"#);
    for _ in 0..3 {
        html.push_str(r#"<div class="page page-skeleton"></div>"#);
    }
    html.push_str("</div>");
    html
}

pub fn error(view: &ErrorView) -> String {
    format!(
        r#"<div class="error"><p>{}</p><a class="retry" href="{}">Try again</a></div>"#,
        escape(&view.message),
        escape(&view.retry.url())
    )
}

fn card(card: &Card) -> String {
    let mut html = format!(
        r#"<a class="card" href="{}"><img src="{}" alt="{}" loading="lazy">"#,
        escape(&card.route().url()),
        image_or_default(&card.image),
        escape(&card.title),
    );
    if let Some(badge) = &card.badge {
        let _ = write!(
            html,
            r#"<span class="badge {}">{}</span>"#,
            card.badge_class,
            escape(badge)
        );
    }
    let _ = write!(html, r#"<h3 class="card-title">{}</h3>"#, escape(&card.title));
    if let Some(subtitle) = &card.subtitle {
        let _ = write!(html, r#"<p class="card-subtitle">{}</p>"#, escape(subtitle));
    }
    html.push_str("</a>");
    html
}

fn cards(cards: &[Card]) -> String {
    let mut html = String::from(r#"<div class="grid">"#);
    for c in cards {
        html.push_str(&card(c));
    }
    html.push_str("</div>");
    html
}

pub fn grid(view: &GridView) -> String {
    let mut html = format!(
        r#"<section class="list"><h2>{}</h2>"#,
        escape(&view.title)
    );

    if view.is_empty() {
        html.push_str(r#"<p class="empty">Nothing here yet.</p>"#);
    } else {
        html.push_str(&cards(&view.cards));
    }

    if view.prev.is_some() || view.next.is_some() {
        html.push_str(r#"<nav class="pagination">"#);
        if let Some(prev) = &view.prev {
            let _ = write!(html, r#"<a class="prev" href="{}">Prev</a>"#, escape(&prev.url()));
        }
        if let Some(page) = view.page {
            let _ = write!(html, r#"<span class="page">Page {page}</span>"#);
        }
        if let Some(next) = &view.next {
            let _ = write!(html, r#"<a class="next" href="{}">Next</a>"#, escape(&next.url()));
        }
        html.push_str("</nav>");
    }

    html.push_str("</section>");
    html
}

pub fn home(view: &HomeView) -> String {
    let mut html = String::from(r#"<div class="home">"#);

    if let Some(hero) = view.active_hero() {
        let _ = write!(
            html,
            r#"<section class="hero" data-active="{}"><a href="{}"><img src="{}" alt="{}"><h2>{}</h2></a><div class="dots">"#,
            view.active,
            escape(&hero.route().url()),
            image_or_default(&hero.image),
            escape(&hero.title),
            escape(&hero.title),
        );
        for i in 0..view.hero.len() {
            let class = if i == view.active { "dot active" } else { "dot" };
            let _ = write!(html, r#"<span class="{class}"></span>"#);
        }
        html.push_str("</div></section>");
    }

    if !view.genres.is_empty() {
        html.push_str(r#"<nav class="genres">"#);
        for genre in &view.genres {
            let route = Route::Genre {
                slug: genre.slug.clone(),
                page: 1,
            };
            let _ = write!(
                html,
                r#"<a class="genre" href="{}">{}</a>"#,
                escape(&route.url()),
                escape(&genre.title)
            );
        }
        html.push_str("</nav>");
    }

    html.push_str(r#"<section class="latest"><h2>Latest Releases</h2>"#);
    html.push_str(&cards(&view.latest));
    html.push_str("</section>");

    if !view.projects.is_empty() {
        html.push_str(r#"<section class="projects"><h2>Project Updates</h2><ul>"#);
        for project in &view.projects {
            let _ = write!(
                html,
                r#"<li><a href="{}">{}</a>"#,
                escape(&project.card.route().url()),
                escape(&project.card.title)
            );
            if let Some(chapter) = &project.latest_chapter {
                let _ = write!(html, r#" <span class="chapter">{}</span>"#, escape(chapter));
            }
            html.push_str("</li>");
        }
        html.push_str("</ul></section>");
    }

    html.push_str("</div>");
    html
}

pub fn detail(view: &DetailView) -> String {
    let mut html = format!(
        r#"<article class="detail"><img class="cover" src="{}" alt="{}"><h1>{}</h1><dl class="meta">"#,
        image_or_default(&view.image),
        escape(&view.title),
        escape(&view.title),
    );
    for (label, value) in [
        ("Rating", &view.rating),
        ("Status", &view.status),
        ("Type", &view.kind),
    ] {
        if let Some(value) = value {
            let _ = write!(html, "<dt>{label}</dt><dd>{}</dd>", escape(value));
        }
    }
    html.push_str("</dl>");

    if !view.genres.is_empty() {
        html.push_str(r#"<ul class="tags">"#);
        for genre in &view.genres {
            let _ = write!(html, "<li>{}</li>", escape(genre));
        }
        html.push_str("</ul>");
    }

    let _ = write!(
        html,
        r#"<p class="synopsis">{}</p>"#,
        escape(&view.visible_synopsis())
    );
    if view.synopsis_clamped() {
        let (label, pairs) = if view.synopsis_expanded {
            ("Show less", vec![("q", view.chapter_filter.as_str())])
        } else {
            (
                "Read more",
                vec![("q", view.chapter_filter.as_str()), ("synopsis", "full")],
            )
        };
        let pairs: Vec<_> = pairs.into_iter().filter(|(_, v)| !v.is_empty()).collect();
        let _ = write!(
            html,
            r#"<a class="synopsis-toggle" href="{}">{label}</a>"#,
            escape(&relative_query(&pairs))
        );
    }

    html.push_str(r#"<div class="actions">"#);
    if let Some(primary) = &view.primary {
        let label = if primary.resume { "Continue Reading" } else { "Start Reading" };
        let _ = write!(
            html,
            r#"<a class="primary" href="{}">{label}</a>"#,
            escape(&primary.route().url())
        );
    }
    let (class, label) = if view.bookmarked {
        ("bookmark active", "Bookmarked")
    } else {
        ("bookmark", "Bookmark")
    };
    let _ = write!(
        html,
        r#"<form class="bookmark-form" method="post" action="/api/bookmark"><input type="hidden" name="slug" value="{}"><input type="hidden" name="title" value="{}"><input type="hidden" name="image" value="{}"><button type="submit" class="{class}">{label}</button></form></div>"#,
        escape(&view.slug),
        escape(&view.title),
        escape(&view.image),
    );

    let _ = write!(
        html,
        r#"<section class="chapters"><form class="chapter-search" method="get"><input type="search" name="q" placeholder="Search chapter..." value="{}">"#,
        escape(&view.chapter_filter)
    );
    if view.synopsis_expanded {
        html.push_str(r#"<input type="hidden" name="synopsis" value="full">"#);
    }
    html.push_str(r#"<button type="submit">Search</button></form><ul>"#);
    for chapter in view.visible_chapters() {
        let route = Route::Chapter {
            id: chapter.slug.clone(),
            series: Some(view.slug.clone()),
        };
        let _ = write!(
            html,
            r#"<li><a href="{}">{}</a>"#,
            escape(&route.url()),
            escape(&chapter.title)
        );
        if let Some(time) = &chapter.time {
            let _ = write!(html, r#" <time>{}</time>"#, escape(time));
        }
        html.push_str("</li>");
    }
    html.push_str("</ul></section></article>");
    html
}

fn chapter_controls(view: &ReaderView) -> String {
    let mut html = String::from(r#"<nav class="chapter-nav">"#);
    if let Some(prev) = &view.prev {
        let _ = write!(html, r#"<a class="prev" href="{}">Prev</a>"#, escape(&prev.url()));
    }
    if !view.jump.is_empty() {
        html.push_str(r#"<form class="jump" method="get" action="/chapter"><select name="id">"#);
        for option in &view.jump {
            let selected = if option.selected { " selected" } else { "" };
            let _ = write!(
                html,
                r#"<option value="{}"{selected}>{}</option>"#,
                escape(&option.slug),
                escape(&option.title)
            );
        }
        html.push_str("</select>");
        if let Some(series) = &view.series_slug {
            let _ = write!(
                html,
                r#"<input type="hidden" name="series" value="{}">"#,
                escape(series)
            );
        }
        html.push_str(r#"<button type="submit">Go</button></form>"#);
    }
    if let Some(next) = &view.next {
        let _ = write!(html, r#"<a class="next" href="{}">Next</a>"#, escape(&next.url()));
    }
    html.push_str("</nav>");
    html
}

/// Page images load in the browser, so a failed page is swapped for a
/// retry button there and put back as a fresh image on tap.
const READER_SCRIPT: &str = r#"<script>(function(){
function failed(img){var b=document.createElement('button');b.type='button';b.className='page page-error';b.dataset.index=img.dataset.index;b.dataset.src=img.src;b.textContent='Failed to load page '+(Number(img.dataset.index)+1)+'. Tap to retry.';img.replaceWith(b);}
function retry(b){var img=document.createElement('img');img.className='page';img.dataset.index=b.dataset.index;img.alt='Page '+(Number(b.dataset.index)+1);img.src=b.dataset.src;b.replaceWith(img);}
document.addEventListener('error',function(e){var t=e.target;if(t instanceof HTMLImageElement&&t.classList.contains('page'))failed(t);},true);
document.addEventListener('click',function(e){var b=e.target.closest&&e.target.closest('.page-error');if(b)retry(b);});
})();</script>"#;

pub fn reader(view: &ReaderView) -> String {
    let mut html = format!(r#"<div class="reader"><h1>{}</h1>"#, escape(&view.title));
    let controls = chapter_controls(view);
    html.push_str(&controls);

    for (index, image) in view.images.iter().enumerate() {
        match image.state {
            ImageState::Errored => {
                let _ = write!(
                    html,
                    r#"<button type="button" class="page page-error" data-index="{index}" data-src="{}">Failed to load page {}. Tap to retry.</button>"#,
                    escape(&image.url),
                    index + 1
                );
            }
            state => {
                let class = if state == ImageState::Pending { "page pending" } else { "page" };
                let _ = write!(
                    html,
                    r#"<img class="{class}" data-index="{index}" src="{}" alt="Page {}">"#,
                    escape(&image.url),
                    index + 1
                );
            }
        }
    }

    html.push_str(&controls);
    html.push_str("</div>");
    html.push_str(READER_SCRIPT);
    html
}

pub fn identity(view: &IdentityView) -> String {
    let mut html = String::from(r#"<div class="identity">"#);
    if let Some(avatar) = &view.avatar {
        let _ = write!(html, r#"<img class="avatar" src="{}" alt="">"#, escape(avatar));
    }
    let _ = write!(
        html,
        r#"<span class="name">{}</span><span class="status">{}</span>"#,
        escape(&view.name),
        view.status
    );
    if view.signed_in {
        html.push_str(
            r#"<form class="logout" method="post" action="/logout"><button type="submit">Logout</button></form>"#,
        );
    } else if let Some(url) = &view.login_url {
        let _ = write!(html, r#"<a class="login" href="{}">Login with Google</a>"#, escape(url));
    }
    html.push_str("</div>");
    html
}

/// Full document around the identity and content fragments
pub fn page(identity: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>Komik</title></head><body><header><a class="brand" href="/">Komik</a><nav><a href="/ongoing">Ongoing</a><a href="/completed">Completed</a><a href="/history">History</a><a href="/bookmarks">Bookmarks</a></nav><div id="user-area">{identity}</div></header><main id="content">{content}</main></body></html>"#
    )
}
