use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "N/A";
pub const DEFAULT_IMAGE: &str = "assets/icon.png";

/// A reading history entry, stored newest first under `fmc_history`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_chapter_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_chapter_title: Option<String>,
    /// Milliseconds since the unix epoch
    #[serde(default)]
    pub timestamp: i64,
}

impl HistoryEntry {
    /// Entry recorded when a series detail page is viewed
    pub fn series(slug: &str, title: &str, image: &str, timestamp: i64) -> Self {
        Self {
            slug: slug.to_string(),
            title: title.to_string(),
            image: image.to_string(),
            last_chapter_slug: None,
            last_chapter_title: None,
            timestamp,
        }
    }

    /// Entry recorded when a chapter is read
    pub fn chapter(slug: &str, chapter_slug: &str, chapter_title: &str, timestamp: i64) -> Self {
        Self {
            slug: slug.to_string(),
            title: String::new(),
            image: String::new(),
            last_chapter_slug: Some(chapter_slug.to_string()),
            last_chapter_title: Some(chapter_title.to_string()),
            timestamp,
        }
    }

    /// Fills whatever this entry left empty from the entry it replaces
    pub fn carry_over(mut self, previous: Option<&HistoryEntry>) -> Self {
        if let Some(previous) = previous {
            if self.title.is_empty() {
                self.title = previous.title.clone();
            }
            if self.image.is_empty() {
                self.image = previous.image.clone();
            }
            if self.last_chapter_slug.is_none() {
                self.last_chapter_slug = previous.last_chapter_slug.clone();
                self.last_chapter_title = previous.last_chapter_title.clone();
            }
        }

        if self.title.is_empty() {
            self.title = DEFAULT_TITLE.to_string();
        }
        if self.image.is_empty() {
            self.image = DEFAULT_IMAGE.to_string();
        }

        self
    }
}

/// Remote form of a history entry, upserted on (user_id, slug)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CloudHistoryRow {
    pub user_id: String,
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub last_chapter_slug: Option<String>,
    #[serde(default)]
    pub last_chapter_title: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl CloudHistoryRow {
    pub fn from_entry(user_id: &str, entry: &HistoryEntry) -> Self {
        let updated_at = Utc
            .timestamp_millis_opt(entry.timestamp)
            .single()
            .filter(|_| entry.timestamp > 0)
            .unwrap_or_else(Utc::now);

        Self {
            user_id: user_id.to_string(),
            slug: entry.slug.clone(),
            title: entry.title.clone(),
            image: entry.image.clone(),
            last_chapter_slug: entry.last_chapter_slug.clone(),
            last_chapter_title: entry.last_chapter_title.clone(),
            updated_at,
        }
    }
}

impl From<CloudHistoryRow> for HistoryEntry {
    fn from(row: CloudHistoryRow) -> Self {
        Self {
            slug: row.slug,
            title: row.title,
            image: row.image,
            last_chapter_slug: row.last_chapter_slug,
            last_chapter_title: row.last_chapter_title,
            timestamp: row.updated_at.timestamp_millis(),
        }
    }
}
