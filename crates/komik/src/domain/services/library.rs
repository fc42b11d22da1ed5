use std::sync::Arc;

use komik_lib::{
    models::{BookmarkEntry, HistoryEntry},
    BOOKMARKS_KEY, HISTORY_CAP, HISTORY_KEY,
};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::domain::{
    repositories::storage::{KeyValueStorage, StorageError},
    services::sync::SyncService,
};

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySource {
    Local,
    Cloud,
}

/// Reading history and bookmarks kept in local storage
pub struct LibraryService {
    storage: Arc<dyn KeyValueStorage>,
    sync: Arc<SyncService>,
}

impl LibraryService {
    pub fn new(storage: Arc<dyn KeyValueStorage>, sync: Arc<SyncService>) -> Self {
        Self { storage, sync }
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.storage.get(key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("ignoring unreadable {key}: {e}");
                vec![]
            }),
            Ok(None) => vec![],
            Err(e) => {
                warn!("failed to read {key}: {e}");
                vec![]
            }
        }
    }

    fn write_list<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), LibraryError> {
        let raw = serde_json::to_string(items).map_err(StorageError::from)?;
        self.storage.set(key, &raw)?;

        Ok(())
    }

    pub fn local_history(&self) -> Vec<HistoryEntry> {
        self.read_list(HISTORY_KEY)
    }

    pub fn find_history(&self, slug: &str) -> Option<HistoryEntry> {
        self.local_history().into_iter().find(|h| h.slug == slug)
    }

    /// Moves the entry to the front of the history, then mirrors it to the
    /// cloud without waiting. Returns the entry as stored.
    pub fn record_history(&self, entry: HistoryEntry) -> Result<HistoryEntry, LibraryError> {
        let history = self.local_history();
        let previous = history.iter().find(|h| h.slug == entry.slug);
        let entry = entry.carry_over(previous);

        let history = push_history(history, entry.clone(), HISTORY_CAP);
        self.write_list(HISTORY_KEY, &history)?;

        self.sync.push_entry(&entry);

        Ok(entry)
    }

    /// History for display, from the cloud table while signed in
    pub async fn list_history(&self) -> (Vec<HistoryEntry>, HistorySource) {
        if self.sync.current_user().is_some() {
            if let Some(entries) = self.sync.remote_history().await {
                return (entries, HistorySource::Cloud);
            }
        }

        (self.local_history(), HistorySource::Local)
    }

    pub fn list_bookmarks(&self) -> Vec<BookmarkEntry> {
        self.read_list(BOOKMARKS_KEY)
    }

    pub fn is_bookmarked(&self, slug: &str) -> bool {
        self.list_bookmarks().iter().any(|b| b.slug == slug)
    }

    /// Adds the bookmark when absent, removes it when present. Returns
    /// whether the series is bookmarked afterwards.
    pub fn toggle_bookmark(
        &self,
        slug: &str,
        title: &str,
        image: &str,
    ) -> Result<bool, LibraryError> {
        let mut bookmarks = self.list_bookmarks();

        let bookmarked = match bookmarks.iter().position(|b| b.slug == slug) {
            Some(index) => {
                bookmarks.remove(index);
                false
            }
            None => {
                bookmarks.push(BookmarkEntry {
                    slug: slug.to_string(),
                    title: title.to_string(),
                    image: image.to_string(),
                });
                true
            }
        };

        self.write_list(BOOKMARKS_KEY, &bookmarks)?;

        Ok(bookmarked)
    }
}

/// Prepends `entry`, dropping any older entry for the same slug and
/// everything past `cap`.
pub fn push_history(
    mut entries: Vec<HistoryEntry>,
    entry: HistoryEntry,
    cap: usize,
) -> Vec<HistoryEntry> {
    entries.retain(|h| h.slug != entry.slug);
    entries.insert(0, entry);
    entries.truncate(cap);
    entries
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::infrastructure::storage::MemoryStorage;

    fn service() -> (Arc<MemoryStorage>, LibraryService) {
        let storage = Arc::new(MemoryStorage::new());
        let svc = LibraryService::new(storage.clone(), Arc::new(SyncService::local()));
        (storage, svc)
    }

    fn entry(slug: &str, timestamp: i64) -> HistoryEntry {
        HistoryEntry::series(slug, slug, "cover.jpg", timestamp)
    }

    #[test]
    fn test_history_cap_evicts_oldest() {
        let (_, svc) = service();
        for i in 0..HISTORY_CAP {
            svc.record_history(entry(&format!("series-{i}"), i as i64))
                .unwrap();
        }
        assert_eq!(svc.local_history().len(), HISTORY_CAP);

        svc.record_history(entry("series-new", 100)).unwrap();

        let history = svc.local_history();
        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history[0].slug, "series-new");
        assert!(!history.iter().any(|h| h.slug == "series-0"));
        assert!(history.iter().any(|h| h.slug == "series-1"));
    }

    #[test]
    fn test_rerecord_moves_to_front() {
        let (_, svc) = service();
        svc.record_history(entry("a", 1)).unwrap();
        svc.record_history(entry("b", 2)).unwrap();
        svc.record_history(entry("c", 3)).unwrap();

        svc.record_history(entry("a", 4)).unwrap();

        let slugs: Vec<String> = svc.local_history().into_iter().map(|h| h.slug).collect();
        assert_eq!(slugs, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_record_keeps_last_chapter() {
        let (_, svc) = service();
        svc.record_history(HistoryEntry::chapter("a", "a-3", "a 3", 1))
            .unwrap();

        let stored = svc.record_history(entry("a", 2)).unwrap();

        assert_eq!(stored.title, "a");
        assert_eq!(stored.last_chapter_slug.as_deref(), Some("a-3"));
        assert_eq!(svc.find_history("a"), Some(stored));
    }

    #[test]
    fn test_toggle_bookmark_twice_restores() {
        let (_, svc) = service();
        svc.toggle_bookmark("a", "A", "a.jpg").unwrap();
        let before = svc.list_bookmarks();

        assert!(svc.toggle_bookmark("b", "B", "b.jpg").unwrap());
        assert!(svc.is_bookmarked("b"));
        assert!(!svc.toggle_bookmark("b", "B", "b.jpg").unwrap());

        assert_eq!(svc.list_bookmarks(), before);
        assert!(!svc.is_bookmarked("b"));
    }

    #[test]
    fn test_unreadable_storage_is_empty() {
        let (storage, svc) = service();
        storage.set(HISTORY_KEY, "{not json").unwrap();

        assert!(svc.local_history().is_empty());
        svc.record_history(entry("a", 1)).unwrap();
        assert_eq!(svc.local_history().len(), 1);
    }

    #[tokio::test]
    async fn test_list_history_local_when_signed_out() {
        let (_, svc) = service();
        svc.record_history(entry("a", 1)).unwrap();

        let (history, source) = svc.list_history().await;

        assert_eq!(source, HistorySource::Local);
        assert_eq!(history.len(), 1);
    }
}
