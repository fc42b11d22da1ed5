use komik_lib::models::{ListPage, Pagination};

use super::card::Card;
use crate::presentation::route::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridView {
    pub title: String,
    pub cards: Vec<Card>,
    pub page: Option<u32>,
    pub prev: Option<Route>,
    pub next: Option<Route>,
}

impl GridView {
    pub fn new(title: &str, cards: Vec<Card>) -> Self {
        Self {
            title: title.to_string(),
            cards,
            page: None,
            prev: None,
            next: None,
        }
    }

    /// Grid of a list page. Prev/next point at the same route on the
    /// neighbouring pages when the pagination allows it.
    pub fn from_page(title: &str, route: &Route, page: &ListPage) -> Self {
        let cards = page.data.iter().map(Card::from).collect();
        let mut view = Self::new(title, cards);
        if let Some(pagination) = &page.pagination {
            view = view.with_pagination(route, pagination);
        }

        view
    }

    pub fn with_pagination(mut self, route: &Route, pagination: &Pagination) -> Self {
        let current = pagination.current_page.max(1);
        self.page = Some(current);
        self.prev = if pagination.has_prev() {
            route.with_page(current - 1)
        } else {
            None
        };
        self.next = if pagination.has_next() {
            current.checked_add(1).and_then(|next| route.with_page(next))
        } else {
            None
        };

        self
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
