use serde::{Deserialize, Serialize};

use super::catalogue::null_as_default;

/// A chapter as listed on a series detail page
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChapterRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChapterNavigation {
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChapterDetail {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub navigation: ChapterNavigation,
    #[serde(default)]
    pub parent_slug: Option<String>,
    #[serde(default)]
    pub comic_slug: Option<String>,
}

impl ChapterDetail {
    /// Slug of the series this chapter belongs to, if the upstream says so
    pub fn series_slug(&self) -> Option<&str> {
        self.parent_slug
            .as_deref()
            .or(self.comic_slug.as_deref())
            .filter(|slug| !slug.is_empty())
    }
}
