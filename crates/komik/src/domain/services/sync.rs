use std::sync::{Arc, PoisonError, RwLock};

use komik_lib::models::{CloudHistoryRow, CloudUser, HistoryEntry};
use tokio::task::JoinHandle;

use crate::domain::repositories::cloud::CloudRepository;

/// Mirrors the local history into the cloud table while a session exists.
/// Every cloud failure is logged and swallowed so local mode keeps working.
pub struct SyncService {
    cloud: Option<Arc<dyn CloudRepository>>,
    user: RwLock<Option<CloudUser>>,
}

impl SyncService {
    pub fn new(cloud: Option<Arc<dyn CloudRepository>>) -> Self {
        Self {
            cloud,
            user: RwLock::new(None),
        }
    }

    pub fn local() -> Self {
        Self::new(None)
    }

    pub fn is_enabled(&self) -> bool {
        self.cloud.is_some()
    }

    pub fn current_user(&self) -> Option<CloudUser> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_user(&self, user: Option<CloudUser>) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = user;
    }

    /// Queries the remote session and, when signed in, pushes every local
    /// entry to the cloud once.
    pub async fn check_auth_status(&self, local: &[HistoryEntry]) -> Option<CloudUser> {
        let cloud = self.cloud.as_ref()?;

        let user = match cloud.current_user().await {
            Ok(user) => user,
            Err(e) => {
                warn!("failed to query cloud session: {e}");
                None
            }
        };
        self.set_user(user.clone());

        if user.is_some() {
            self.sync_local_to_cloud(local).await;
        }

        user
    }

    /// Overwrites the remote rows with the local ones, no timestamp comparison
    pub async fn sync_local_to_cloud(&self, local: &[HistoryEntry]) {
        let (Some(cloud), Some(user)) = (self.cloud.as_ref(), self.current_user()) else {
            return;
        };
        if local.is_empty() {
            return;
        }

        let rows: Vec<CloudHistoryRow> = local
            .iter()
            .map(|entry| CloudHistoryRow::from_entry(&user.id, entry))
            .collect();

        match cloud.upsert_history(&rows).await {
            Ok(()) => info!("synced {} local history entries to cloud", rows.len()),
            Err(e) => warn!("failed to sync local history to cloud: {e}"),
        }
    }

    /// Upserts one entry in the background
    pub fn push_entry(&self, entry: &HistoryEntry) -> Option<JoinHandle<()>> {
        let cloud = self.cloud.clone()?;
        let user = self.current_user()?;
        let row = CloudHistoryRow {
            updated_at: chrono::Utc::now(),
            ..CloudHistoryRow::from_entry(&user.id, entry)
        };

        Some(tokio::spawn(async move {
            if let Err(e) = cloud.upsert_history(&[row]).await {
                warn!("failed to save history to cloud: {e}");
            }
        }))
    }

    /// History read from the cloud, `None` when signed out or on failure
    pub async fn remote_history(&self) -> Option<Vec<HistoryEntry>> {
        let cloud = self.cloud.as_ref()?;
        let user = self.current_user()?;

        match cloud.fetch_history(&user.id).await {
            Ok(rows) => Some(rows.into_iter().map(HistoryEntry::from).collect()),
            Err(e) => {
                warn!("failed to fetch cloud history: {e}");
                None
            }
        }
    }

    pub fn login_url(&self, redirect_to: &str) -> Option<String> {
        self.cloud.as_ref().map(|cloud| cloud.login_url(redirect_to))
    }

    pub async fn logout(&self) {
        if let Some(cloud) = self.cloud.as_ref() {
            if let Err(e) = cloud.sign_out().await {
                warn!("failed to sign out: {e}");
            }
        }
        self.set_user(None);
    }
}
