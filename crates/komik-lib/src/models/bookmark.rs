use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BookmarkEntry {
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
}
