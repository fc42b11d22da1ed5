use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::chapter::ChapterRef;

/// Every upstream payload nests its body under `data`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DataWrapper<T> {
    pub data: T,
}

/// A series as shown on a card
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesCard {
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, rename = "type", deserialize_with = "string_or_number")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub chapter: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub latest_chapter: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chapters: Vec<ChapterRef>,
}

impl SeriesCard {
    /// Label of the newest chapter, whichever field the upstream filled in
    pub fn chapter_label(&self) -> Option<&str> {
        self.chapter
            .as_deref()
            .or(self.latest_chapter.as_deref())
            .or_else(|| self.chapters.first().map(|ch| ch.title.as_str()))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub hot_updates: Vec<SeriesCard>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latest_releases: Vec<SeriesCard>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub project_updates: Vec<SeriesCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Genre {
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SeriesDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub status: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "string_or_number")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub synopsis: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chapters: Vec<ChapterRef>,
}

impl SeriesDetail {
    /// The chronologically earliest chapter. Chapters arrive newest first,
    /// so this is the last element.
    pub fn earliest_chapter(&self) -> Option<&ChapterRef> {
        self.chapters.last()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(
        default = "first_page",
        alias = "current_page",
        alias = "page",
        deserialize_with = "page_or_first"
    )]
    pub current_page: u32,
    #[serde(default, alias = "total_pages", alias = "lastPage")]
    pub total_pages: Option<u32>,
    #[serde(default, alias = "has_next_page", alias = "hasNext")]
    pub has_next_page: Option<bool>,
}

fn first_page() -> u32 {
    1
}

fn page_or_first<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_else(first_page))
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        match (self.has_next_page, self.total_pages) {
            (Some(has_next), _) => has_next,
            (None, Some(total)) => self.current_page < total,
            (None, None) => true,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }
}

/// A page of series cards, used by list, genre and search endpoints
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<SeriesCard>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Treats an explicit `null` like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_with_missing_fields() {
        let detail: DataWrapper<SeriesDetail> = serde_json::from_value(json!({
            "data": {
                "title": "One Piece",
                "rating": 8.5,
                "chapters": [{ "slug": "ch-2" }, { "slug": "ch-1" }]
            }
        }))
        .unwrap();

        assert_eq!(detail.data.title, "One Piece");
        assert_eq!(detail.data.rating.as_deref(), Some("8.5"));
        assert_eq!(detail.data.image, "");
        assert!(detail.data.genres.is_empty());
        assert_eq!(detail.data.earliest_chapter().unwrap().slug, "ch-1");
    }

    #[test]
    fn test_detail_with_null_fields() {
        let detail: DataWrapper<SeriesDetail> = serde_json::from_value(json!({
            "data": {
                "title": "One Piece",
                "image": null,
                "genres": null,
                "synopsis": null,
                "chapters": [{ "slug": "ch-1", "title": null }]
            }
        }))
        .unwrap();

        assert_eq!(detail.data.title, "One Piece");
        assert_eq!(detail.data.image, "");
        assert!(detail.data.genres.is_empty());
        assert_eq!(detail.data.synopsis, None);
        assert_eq!(detail.data.chapters[0].title, "");

        let list: ListPage = serde_json::from_value(json!({
            "data": [{ "slug": "a", "title": null, "image": null, "chapters": null }],
            "pagination": { "currentPage": null, "hasNextPage": null }
        }))
        .unwrap();

        assert_eq!(list.data[0].title, "");
        let pagination = list.pagination.unwrap();
        assert_eq!(pagination.current_page, 1);
        assert!(pagination.has_next());

        let home: HomeData = serde_json::from_value(json!({ "hotUpdates": null })).unwrap();
        assert!(home.hot_updates.is_empty());
    }

    #[test]
    fn test_home_data() {
        let home: DataWrapper<HomeData> = serde_json::from_value(json!({
            "data": {
                "hotUpdates": [{ "slug": "a", "title": "A", "type": "Manhwa", "chapter": "Ch 10" }],
                "latestReleases": [{ "slug": "b", "title": "B", "latestChapter": 3 }],
                "projectUpdates": [{ "slug": "c", "title": "C", "chapters": [{ "slug": "c-9", "title": "Chapter 9" }] }]
            }
        }))
        .unwrap();

        assert_eq!(home.data.hot_updates[0].kind.as_deref(), Some("Manhwa"));
        assert_eq!(home.data.hot_updates[0].chapter_label(), Some("Ch 10"));
        assert_eq!(home.data.latest_releases[0].chapter_label(), Some("3"));
        assert_eq!(home.data.project_updates[0].chapter_label(), Some("Chapter 9"));
    }

    #[test]
    fn test_pagination_next() {
        let explicit = Pagination {
            current_page: 3,
            total_pages: Some(10),
            has_next_page: Some(false),
        };
        assert!(!explicit.has_next());

        let by_total = Pagination {
            current_page: 10,
            total_pages: Some(10),
            has_next_page: None,
        };
        assert!(!by_total.has_next());
        assert!(by_total.has_prev());

        let first: Pagination = serde_json::from_value(json!({})).unwrap();
        assert_eq!(first.current_page, 1);
        assert!(first.has_next());
        assert!(!first.has_prev());
    }
}
