//! Folder directory store
//!
//! Holds the full list of candidate target folders and filters it on the
//! client. The "before photo" precondition is never answered from this
//! cache: every call goes to the provider.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{watch, RwLock};
use tracing::{debug, warn};

use crate::domain::{Folder, FolderId};
use crate::ports::IFolderDirectoryProvider;

#[derive(Debug, Default)]
struct DirectoryState {
    folders: Vec<Folder>,
    loaded: bool,
    stale: bool,
}

/// In-memory state container for the folder directory
pub struct FolderDirectoryStore {
    provider: Arc<dyn IFolderDirectoryProvider>,
    state: RwLock<DirectoryState>,
    case_sensitive: bool,
    revision: watch::Sender<u64>,
}

impl FolderDirectoryStore {
    /// Creates an empty store with case-insensitive title search
    pub fn new(provider: Arc<dyn IFolderDirectoryProvider>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            provider,
            state: RwLock::new(DirectoryState::default()),
            case_sensitive: false,
            revision,
        }
    }

    /// Switches title search to case-sensitive matching
    #[must_use]
    pub fn with_case_sensitive_search(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Reloads every folder from the server
    ///
    /// On failure the previous list is kept and the store is flagged stale.
    pub async fn refetch(&self) -> Result<usize> {
        let result = self
            .provider
            .list(None)
            .await
            .context("Failed to load folder directory");

        let count = {
            let mut state = self.state.write().await;
            match result {
                Ok(folders) => {
                    let count = folders.len();
                    state.folders = folders;
                    state.loaded = true;
                    state.stale = false;
                    Ok(count)
                }
                Err(e) => {
                    warn!(error = %e, "Folder directory refetch failed, keeping local list");
                    state.stale = true;
                    Err(e)
                }
            }
        };
        self.revision.send_modify(|rev| *rev += 1);

        if let Ok(n) = &count {
            debug!(count = n, "Folder directory loaded");
        }
        count
    }

    /// Lists folders whose title contains `search`, in server order
    ///
    /// An empty or blank query returns every folder.
    pub async fn list(&self, search: Option<&str>) -> Vec<Folder> {
        let state = self.state.read().await;
        match search.map(str::trim).filter(|q| !q.is_empty()) {
            Some(query) => state
                .folders
                .iter()
                .filter(|f| f.title_matches(query, self.case_sensitive))
                .cloned()
                .collect(),
            None => state.folders.clone(),
        }
    }

    /// Snapshot of every loaded folder
    pub async fn folders(&self) -> Vec<Folder> {
        self.list(None).await
    }

    pub async fn get(&self, folder_id: &FolderId) -> Option<Folder> {
        self.state
            .read()
            .await
            .folders
            .iter()
            .find(|f| f.id() == folder_id)
            .cloned()
    }

    /// Returns true once the directory has loaded successfully at least once
    pub async fn is_loaded(&self) -> bool {
        self.state.read().await.loaded
    }

    pub async fn is_stale(&self) -> bool {
        self.state.read().await.stale
    }

    /// Asks the server whether the folder already holds a "before" photo
    ///
    /// Always a round trip; the answer is not cached.
    pub async fn has_before_photo(&self, folder_id: &FolderId) -> Result<bool> {
        let has_before = self
            .provider
            .has_before_photo(folder_id)
            .await
            .with_context(|| format!("Failed to check before photo of folder {folder_id}"))?;
        debug!(folder_id = %folder_id, has_before, "Before-photo precondition checked");
        Ok(has_before)
    }
}
