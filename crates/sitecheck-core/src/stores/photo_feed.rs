//! Photo feed store
//!
//! Holds the currently displayed page of the photo feed. Reads hand out
//! cloned snapshots. The only in-place mutators are [`PhotoFeedStore::mark_assigned`]
//! and [`PhotoFeedStore::revert`], both crate-private and driven by the
//! assignment coordinator through [`OptimisticAssignment`].
//!
//! ## Epochs
//!
//! Every successful `list`/`refetch` replaces the local state with what the
//! server reports and advances the store epoch. An optimistic update records
//! the epoch it was applied in; committing or aborting it in a later epoch is
//! a no-op, so a refetch always wins over a racing optimistic update.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use crate::domain::{
    DateFilter, DomainError, FolderId, PageRequest, PendingAssignment, Photo, PhotoId, PhotoRole,
};
use crate::ports::IPhotoFeedProvider;

use super::optimistic::OptimisticAssignment;

#[derive(Debug, Default)]
struct FeedState {
    photos: Vec<Photo>,
    page: PageRequest,
    filter: Option<DateFilter>,
    epoch: u64,
    stale: bool,
}

/// In-memory state container for the photo feed
pub struct PhotoFeedStore {
    provider: Arc<dyn IPhotoFeedProvider>,
    state: RwLock<FeedState>,
    revision: watch::Sender<u64>,
}

impl PhotoFeedStore {
    /// Creates an empty store backed by the given feed provider
    pub fn new(provider: Arc<dyn IPhotoFeedProvider>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            provider,
            state: RwLock::new(FeedState::default()),
            revision,
        }
    }

    pub(crate) fn provider(&self) -> &Arc<dyn IPhotoFeedProvider> {
        &self.provider
    }

    /// Subscribes to store changes
    ///
    /// The received value is a revision counter bumped on every change;
    /// re-read the store with [`photos`](Self::photos) when it moves.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Loads one page of the feed, replacing the local state
    ///
    /// The result is sorted most-recent-first. Calling `list` again with the
    /// same arguments yields a fresh, deterministic slice; there is no
    /// incremental scroll state.
    ///
    /// # Errors
    /// Returns an error if the provider call fails. Local state is left untouched.
    pub async fn list(&self, page: PageRequest, filter: Option<DateFilter>) -> Result<Vec<Photo>> {
        debug!(
            page = page.number(),
            per_page = page.size(),
            filtered = filter.is_some(),
            "Loading photo feed page"
        );

        let mut photos = self
            .provider
            .list(&page, filter.as_ref())
            .await
            .context("Failed to load photo feed page")?;

        if let Some(ref f) = filter {
            photos.retain(|p| f.matches(p.created_at()));
        }
        photos.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        {
            let mut state = self.state.write().await;
            state.photos = photos.clone();
            state.page = page;
            state.filter = filter;
            state.epoch += 1;
            state.stale = false;
            debug!(epoch = state.epoch, count = photos.len(), "Photo feed replaced");
        }
        self.bump();

        Ok(photos)
    }

    /// Discards local state and reloads the current page from the server
    ///
    /// Any optimistic update still in flight collapses into whatever the
    /// server reports. On failure the local state is kept and the store is
    /// flagged stale until the next successful load.
    pub async fn refetch(&self) -> Result<Vec<Photo>> {
        let (page, filter) = {
            let state = self.state.read().await;
            (state.page, state.filter)
        };

        match self.list(page, filter).await {
            Ok(photos) => {
                info!(count = photos.len(), "Photo feed reconciled with server");
                Ok(photos)
            }
            Err(e) => {
                warn!(error = %e, "Photo feed refetch failed, keeping local state");
                self.state.write().await.stale = true;
                self.bump();
                Err(e)
            }
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Snapshot of the photos currently held, most recent first
    pub async fn photos(&self) -> Vec<Photo> {
        self.state.read().await.photos.clone()
    }

    /// Snapshot of the photos still waiting in the inbox
    pub async fn unassigned(&self) -> Vec<Photo> {
        self.state
            .read()
            .await
            .photos
            .iter()
            .filter(|p| p.is_unassigned())
            .cloned()
            .collect()
    }

    /// Snapshot of a single photo
    pub async fn get(&self, photo_id: &PhotoId) -> Option<Photo> {
        self.state
            .read()
            .await
            .photos
            .iter()
            .find(|p| p.id() == photo_id)
            .cloned()
    }

    pub async fn current_page(&self) -> PageRequest {
        self.state.read().await.page
    }

    pub async fn current_filter(&self) -> Option<DateFilter> {
        self.state.read().await.filter
    }

    pub async fn epoch(&self) -> u64 {
        self.state.read().await.epoch
    }

    /// Returns true if the last reconciling refetch failed
    pub async fn is_stale(&self) -> bool {
        self.state.read().await.stale
    }

    // ========================================================================
    // Optimistic mutation
    // ========================================================================

    /// Applies an optimistic assignment and returns its two-phase handle
    ///
    /// # Errors
    /// Returns an error if the photo is not held by the store or is no longer unassigned
    pub(crate) async fn begin_optimistic(
        &self,
        photo_id: &PhotoId,
        folder_id: FolderId,
        role: PhotoRole,
    ) -> Result<OptimisticAssignment<'_>, DomainError> {
        let pending = self.mark_assigned(photo_id, folder_id, role).await?;
        Ok(OptimisticAssignment::new(self, pending))
    }

    /// Marks a photo as assigned without waiting for the server
    ///
    /// The unassigned check and the mutation happen under one write lock, so
    /// two concurrent drops of the same photo cannot both succeed here.
    pub(crate) async fn mark_assigned(
        &self,
        photo_id: &PhotoId,
        folder_id: FolderId,
        role: PhotoRole,
    ) -> Result<PendingAssignment, DomainError> {
        let pending = {
            let mut state = self.state.write().await;
            let epoch = state.epoch;
            let photo = state
                .photos
                .iter_mut()
                .find(|p| p.id() == photo_id)
                .ok_or_else(|| {
                    DomainError::ValidationFailed(format!("photo {photo_id} is not in the feed"))
                })?;

            let previous = photo.clone();
            photo.assign(folder_id.clone(), role)?;
            PendingAssignment::new(previous, folder_id, role, epoch)
        };
        self.bump();

        debug!(
            assignment_id = %pending.id(),
            photo_id = %photo_id,
            folder_id = %pending.target_folder_id(),
            role = %role,
            "Applied optimistic assignment"
        );
        Ok(pending)
    }

    /// Restores a photo to its pre-drop snapshot
    ///
    /// Returns `false` without touching anything if the store has been
    /// reloaded since the optimistic update, or if the photo no longer
    /// carries the optimistic assignment.
    pub(crate) async fn revert(&self, pending: &PendingAssignment) -> bool {
        let reverted = {
            let mut state = self.state.write().await;
            if state.epoch != pending.epoch() {
                debug!(
                    assignment_id = %pending.id(),
                    "Feed reloaded since optimistic update, skipping revert"
                );
                return false;
            }
            match state
                .photos
                .iter_mut()
                .find(|p| p.id() == pending.photo_id())
            {
                Some(photo) if carries(photo, pending) => {
                    *photo = pending.previous().clone();
                    true
                }
                _ => false,
            }
        };
        if reverted {
            self.bump();
        }
        reverted
    }

    /// Replaces the optimistic record with the server's confirmed copy
    pub(crate) async fn confirm(&self, pending: &PendingAssignment, confirmed: Photo) -> bool {
        if confirmed.id() != pending.photo_id()
            || confirmed.assigned_folder_id() != Some(pending.target_folder_id())
            || confirmed.assignment().role() != Some(pending.role())
        {
            warn!(
                assignment_id = %pending.id(),
                server_state = %confirmed.assignment_state(),
                "Server copy disagrees with optimistic assignment, keeping local record"
            );
            return false;
        }

        let replaced = {
            let mut state = self.state.write().await;
            if state.epoch != pending.epoch() {
                return false;
            }
            match state
                .photos
                .iter_mut()
                .find(|p| p.id() == pending.photo_id())
            {
                Some(photo) if carries(photo, pending) => {
                    *photo = confirmed;
                    true
                }
                _ => false,
            }
        };
        if replaced {
            self.bump();
        }
        replaced
    }
}

fn carries(photo: &Photo, pending: &PendingAssignment) -> bool {
    photo.assigned_folder_id() == Some(pending.target_folder_id())
        && photo.assignment().role() == Some(pending.role())
}
