//! Photo assignment use case
//!
//! Turns a completed drop of an inbox photo onto a folder into an assignment:
//! checks the folder's before-photo precondition, settles the role, applies
//! the assignment optimistically, confirms it with the server, and rolls it
//! back if the server refuses.
//!
//! The only suspension points are the precondition query, the optional role
//! prompt, and the mutation call. Nothing is retried automatically; a failed
//! drop leaves the UI exactly as it was before the gesture.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::domain::{AssignmentId, AssignmentState, FolderId, Photo, PhotoId, PhotoRole};
use crate::ports::{INotificationService, IRoleSelector, Notification};
use crate::stores::{FolderDirectoryStore, PhotoFeedStore};

// ============================================================================
// Errors and results
// ============================================================================

/// Reasons a drop did not end in a confirmed assignment
#[derive(Debug, Error)]
pub enum AssignmentError {
    /// Local state no longer shows the photo as unassigned; aborted silently
    #[error("photo {photo_id} is not unassigned locally (state: {state:?})")]
    StaleLocalState {
        photo_id: PhotoId,
        state: Option<AssignmentState>,
    },

    /// The before-photo precondition could not be evaluated; nothing was changed
    #[error("could not check folder {folder_id} for a before photo")]
    PreconditionQueryFailed {
        folder_id: FolderId,
        #[source]
        source: anyhow::Error,
    },

    /// The folder accepts no role at all
    #[error("folder {0} accepts no photo role")]
    NoLegalRole(FolderId),

    /// The user dismissed the role prompt; nothing was changed
    #[error("role selection cancelled")]
    RoleSelectionCancelled,

    /// The role prompt itself failed; nothing was changed
    #[error("role selection failed")]
    RoleSelectionFailed(#[source] anyhow::Error),

    /// The role prompt answered with a role that was not offered
    #[error("role {0} was not one of the offered roles")]
    InvalidRoleChoice(PhotoRole),

    /// The server refused the mutation or could not be reached; rolled back
    #[error("assignment of photo {photo_id} to folder {folder_id} as {role} failed")]
    AssignmentRejected {
        photo_id: PhotoId,
        folder_id: FolderId,
        role: PhotoRole,
        rolled_back: bool,
        #[source]
        source: anyhow::Error,
    },

    /// The coordinator was detached before the drop completed
    #[error("drop discarded after coordinator was detached")]
    Discarded,
}

impl AssignmentError {
    /// Returns true for outcomes the user should not be told about
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            AssignmentError::StaleLocalState { .. }
                | AssignmentError::RoleSelectionCancelled
                | AssignmentError::Discarded
        )
    }
}

/// Result of a confirmed assignment
#[derive(Debug, Clone)]
pub struct AssignmentReceipt {
    pub assignment_id: AssignmentId,
    pub folder_id: FolderId,
    pub role: PhotoRole,
    /// The photo as returned by the server
    pub photo: Photo,
    /// False if the reconciling refetch was skipped or failed
    pub reconciled: bool,
}

/// Tunables for the coordinator
#[derive(Debug, Clone, Copy)]
pub struct AssignmentOptions {
    /// Refetch both stores after every confirmed or rolled-back drop
    pub refetch_after_assignment: bool,
}

impl Default for AssignmentOptions {
    fn default() -> Self {
        Self {
            refetch_after_assignment: true,
        }
    }
}

// ============================================================================
// AssignmentCoordinator
// ============================================================================

/// Coordinates drag-and-drop assignment of photos to folders
pub struct AssignmentCoordinator {
    photo_store: Arc<PhotoFeedStore>,
    folder_store: Arc<FolderDirectoryStore>,
    role_selector: Arc<dyn IRoleSelector>,
    notifier: Arc<dyn INotificationService>,
    options: AssignmentOptions,
    role_rule: fn(bool) -> Vec<PhotoRole>,
    lifetime: CancellationToken,
}

impl AssignmentCoordinator {
    /// Creates a coordinator over the given stores
    ///
    /// # Arguments
    ///
    /// * `photo_store` - Feed store the optimistic update is applied to
    /// * `folder_store` - Directory store answering the before-photo precondition
    /// * `role_selector` - Prompt used when several roles are legal
    /// * `notifier` - Side channel for success, warning and error messages
    pub fn new(
        photo_store: Arc<PhotoFeedStore>,
        folder_store: Arc<FolderDirectoryStore>,
        role_selector: Arc<dyn IRoleSelector>,
        notifier: Arc<dyn INotificationService>,
    ) -> Self {
        Self {
            photo_store,
            folder_store,
            role_selector,
            notifier,
            options: AssignmentOptions::default(),
            role_rule: PhotoRole::candidates_for,
            lifetime: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: AssignmentOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the rule mapping the before-photo answer to legal roles
    #[cfg(test)]
    #[must_use]
    pub(crate) fn with_role_rule(mut self, rule: fn(bool) -> Vec<PhotoRole>) -> Self {
        self.role_rule = rule;
        self
    }

    pub fn photo_store(&self) -> &Arc<PhotoFeedStore> {
        &self.photo_store
    }

    pub fn folder_store(&self) -> &Arc<FolderDirectoryStore> {
        &self.folder_store
    }

    /// Detaches the coordinator from its view
    ///
    /// Drops already in flight still complete their network calls, but
    /// their results are discarded: no store update, no notification.
    pub fn detach(&self) {
        info!("Assignment coordinator detached");
        self.lifetime.cancel();
    }

    pub fn is_detached(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    /// Spawns [`handle_drop`](Self::handle_drop) on the current runtime
    ///
    /// This is the fire-and-forget entry point for drop targets. Feedback
    /// reaches the user through store updates and notifications; the handle
    /// is only useful to tests and to callers that want to wait.
    pub fn dispatch_drop(
        self: &Arc<Self>,
        photo_id: PhotoId,
        folder_id: FolderId,
    ) -> JoinHandle<Result<AssignmentReceipt, AssignmentError>> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move { coordinator.handle_drop(photo_id, folder_id).await })
    }

    /// Assigns a dropped photo to the folder it was dropped on
    ///
    /// This method:
    /// 1. Checks the photo is held by the feed store and still unassigned
    /// 2. Queries the folder's before-photo precondition (server round trip)
    /// 3. Derives the legal roles and, if more than one, asks the user
    /// 4. Applies the assignment optimistically to the feed store
    /// 5. Issues the server mutation
    /// 6. Commits on success, or restores the pre-drop snapshot on failure
    /// 7. Optionally refetches both stores to pick up concurrent changes
    ///
    /// # Errors
    ///
    /// See [`AssignmentError`]. Silent variants produce no notification.
    pub async fn handle_drop(
        &self,
        photo_id: PhotoId,
        folder_id: FolderId,
    ) -> Result<AssignmentReceipt, AssignmentError> {
        let span = info_span!("handle_drop", photo_id = %photo_id, folder_id = %folder_id);
        self.run_drop(photo_id, folder_id).instrument(span).await
    }

    async fn run_drop(
        &self,
        photo_id: PhotoId,
        folder_id: FolderId,
    ) -> Result<AssignmentReceipt, AssignmentError> {
        // Step 1: Local state must still show the photo in the inbox
        match self.photo_store.get(&photo_id).await {
            Some(photo) if photo.is_unassigned() => {}
            other => {
                let state = other.map(|p| p.assignment_state());
                debug!(?state, "Dropped photo is not unassigned locally, ignoring drop");
                return Err(AssignmentError::StaleLocalState { photo_id, state });
            }
        }

        // Step 2: Fresh precondition query, never cached
        let has_before = match self.folder_store.has_before_photo(&folder_id).await {
            Ok(has_before) => has_before,
            Err(source) => {
                self.ensure_attached()?;
                warn!(error = %source, "Before-photo precondition query failed");
                self.notify(Notification::error(format!(
                    "Could not check folder {folder_id}. Nothing was changed, please try again."
                )))
                .await;
                return Err(AssignmentError::PreconditionQueryFailed { folder_id, source });
            }
        };
        self.ensure_attached()?;

        // Step 3: Settle the role
        let candidates = (self.role_rule)(has_before);
        let role = self.select_role(&photo_id, &folder_id, &candidates).await?;
        debug!(has_before, role = %role, "Role determined");

        // Step 4: Optimistic update; re-checks unassigned under the store lock
        let optimistic = match self
            .photo_store
            .begin_optimistic(&photo_id, folder_id.clone(), role)
            .await
        {
            Ok(handle) => handle,
            Err(e) => {
                debug!(error = %e, "Photo changed while checking precondition, ignoring drop");
                let state = self
                    .photo_store
                    .get(&photo_id)
                    .await
                    .map(|p| p.assignment_state());
                return Err(AssignmentError::StaleLocalState { photo_id, state });
            }
        };
        let assignment_id = optimistic.pending().id();

        // Step 5: Server mutation, no retry
        let result = self
            .photo_store
            .provider()
            .assign(&photo_id, &folder_id, role)
            .await;

        if self.is_detached() {
            optimistic.abandon();
            return Err(AssignmentError::Discarded);
        }

        match result {
            Ok(confirmed) => {
                // Step 6a: Confirm
                optimistic.commit(Some(confirmed.clone())).await;
                info!(assignment_id = %assignment_id, role = %role, "Photo assignment confirmed");
                self.notify(Notification::success(format!(
                    "Photo assigned to folder {folder_id} as {role} photo"
                )))
                .await;

                let reconciled = self.reconcile().await;

                Ok(AssignmentReceipt {
                    assignment_id,
                    folder_id,
                    role,
                    photo: confirmed,
                    reconciled,
                })
            }
            Err(source) => {
                // Step 6b: Roll back
                let rolled_back = optimistic.abort().await;
                warn!(
                    assignment_id = %assignment_id,
                    role = %role,
                    rolled_back,
                    error = %source,
                    "Photo assignment failed, rolled back"
                );
                self.notify(Notification::error(format!(
                    "Could not assign photo to folder {folder_id}: {source:#}"
                )))
                .await;

                self.reconcile().await;

                Err(AssignmentError::AssignmentRejected {
                    photo_id,
                    folder_id,
                    role,
                    rolled_back,
                    source,
                })
            }
        }
    }

    /// Picks the role, prompting the user only when there is a real choice
    async fn select_role(
        &self,
        photo_id: &PhotoId,
        folder_id: &FolderId,
        candidates: &[PhotoRole],
    ) -> Result<PhotoRole, AssignmentError> {
        match candidates {
            [] => Err(AssignmentError::NoLegalRole(folder_id.clone())),
            [only] => Ok(*only),
            _ => {
                debug!(?candidates, "Several legal roles, asking user");
                let answer = self.role_selector.ask(photo_id, folder_id, candidates).await;
                self.ensure_attached()?;
                match answer {
                    Ok(Some(role)) if candidates.contains(&role) => Ok(role),
                    Ok(Some(role)) => Err(AssignmentError::InvalidRoleChoice(role)),
                    Ok(None) => {
                        debug!("Role selection cancelled by user");
                        Err(AssignmentError::RoleSelectionCancelled)
                    }
                    Err(e) => {
                        warn!(error = %e, "Role selection prompt failed");
                        self.notify(Notification::error("Could not ask for the photo role"))
                            .await;
                        Err(AssignmentError::RoleSelectionFailed(e))
                    }
                }
            }
        }
    }

    /// Refetches both stores, keeping local state if that fails
    ///
    /// Returns true if both stores were reloaded.
    async fn reconcile(&self) -> bool {
        if !self.options.refetch_after_assignment {
            return false;
        }

        let (photos, folders) =
            tokio::join!(self.photo_store.refetch(), self.folder_store.refetch());

        if self.is_detached() {
            return false;
        }

        match (photos, folders) {
            (Ok(_), Ok(_)) => true,
            (photos, folders) => {
                warn!(
                    photos_ok = photos.is_ok(),
                    folders_ok = folders.is_ok(),
                    "Reconciling refetch failed, displayed data may be out of date"
                );
                self.notify(Notification::warning(
                    "Could not refresh photos and folders; displayed data may be out of date",
                ))
                .await;
                false
            }
        }
    }

    fn ensure_attached(&self) -> Result<(), AssignmentError> {
        if self.is_detached() {
            debug!("Coordinator detached, discarding drop");
            return Err(AssignmentError::Discarded);
        }
        Ok(())
    }

    async fn notify(&self, notification: Notification) {
        if let Err(e) = self.notifier.notify(&notification).await {
            warn!(error = %e, kind = %notification.kind, "Failed to deliver notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use chrono::Utc;

    use crate::domain::{Assignment, DateFilter, Folder, PageRequest};
    use crate::ports::{IFolderDirectoryProvider, IPhotoFeedProvider};

    struct EmptyFeed;

    #[async_trait::async_trait]
    impl IPhotoFeedProvider for EmptyFeed {
        async fn list(
            &self,
            _page: &PageRequest,
            _filter: Option<&DateFilter>,
        ) -> anyhow::Result<Vec<Photo>> {
            Ok(Vec::new())
        }

        async fn assign(
            &self,
            _photo_id: &PhotoId,
            _folder_id: &FolderId,
            _role: PhotoRole,
        ) -> anyhow::Result<Photo> {
            anyhow::bail!("not used")
        }
    }

    struct EmptyDirectory;

    #[async_trait::async_trait]
    impl IFolderDirectoryProvider for EmptyDirectory {
        async fn list(&self, _search: Option<&str>) -> anyhow::Result<Vec<Folder>> {
            Ok(Vec::new())
        }

        async fn has_before_photo(&self, _folder_id: &FolderId) -> anyhow::Result<bool> {
            Ok(false)
        }
    }

    enum Answer {
        Pick(PhotoRole),
        Cancel,
        Fail,
    }

    struct ScriptedSelector {
        answer: Answer,
        asked: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl IRoleSelector for ScriptedSelector {
        async fn ask(
            &self,
            _photo_id: &PhotoId,
            _folder_id: &FolderId,
            _candidates: &[PhotoRole],
        ) -> anyhow::Result<Option<PhotoRole>> {
            self.asked.fetch_add(1, Ordering::SeqCst);
            match self.answer {
                Answer::Pick(role) => Ok(Some(role)),
                Answer::Cancel => Ok(None),
                Answer::Fail => anyhow::bail!("prompt window closed"),
            }
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Notification>>,
    }

    #[async_trait::async_trait]
    impl INotificationService for RecordingNotifier {
        async fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    fn coordinator(
        answer: Answer,
    ) -> (
        AssignmentCoordinator,
        Arc<ScriptedSelector>,
        Arc<RecordingNotifier>,
    ) {
        let selector = Arc::new(ScriptedSelector {
            answer,
            asked: AtomicUsize::new(0),
        });
        let notifier = Arc::new(RecordingNotifier::default());
        let coordinator = AssignmentCoordinator::new(
            Arc::new(PhotoFeedStore::new(Arc::new(EmptyFeed))),
            Arc::new(FolderDirectoryStore::new(Arc::new(EmptyDirectory))),
            selector.clone(),
            notifier.clone(),
        );
        (coordinator, selector, notifier)
    }

    fn ids() -> (PhotoId, FolderId) {
        (
            PhotoId::new("p1".to_string()).unwrap(),
            FolderId::new("f1".to_string()).unwrap(),
        )
    }

    const BOTH: [PhotoRole; 2] = [PhotoRole::Before, PhotoRole::After];

    /// Feed holding a single photo that accepts any assignment
    struct OnePhotoFeed {
        photo: Photo,
        assign_calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl IPhotoFeedProvider for OnePhotoFeed {
        async fn list(
            &self,
            _page: &PageRequest,
            _filter: Option<&DateFilter>,
        ) -> anyhow::Result<Vec<Photo>> {
            Ok(vec![self.photo.clone()])
        }

        async fn assign(
            &self,
            _photo_id: &PhotoId,
            folder_id: &FolderId,
            role: PhotoRole,
        ) -> anyhow::Result<Photo> {
            self.assign_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.photo.clone().with_assignment(Assignment::Assigned {
                folder_id: folder_id.clone(),
                role,
            }))
        }
    }

    fn both_roles(_has_before: bool) -> Vec<PhotoRole> {
        BOTH.to_vec()
    }

    async fn prompting_coordinator(
        answer: Answer,
    ) -> (AssignmentCoordinator, Arc<OnePhotoFeed>, Arc<RecordingNotifier>) {
        let (photo_id, _) = ids();
        let feed = Arc::new(OnePhotoFeed {
            photo: Photo::new(photo_id, "Kitchen", Utc::now(), "https://cdn.example.com/p1.jpg"),
            assign_calls: AtomicUsize::new(0),
        });
        let photo_store = Arc::new(PhotoFeedStore::new(feed.clone()));
        photo_store.list(PageRequest::first(), None).await.unwrap();

        let notifier = Arc::new(RecordingNotifier::default());
        let coordinator = AssignmentCoordinator::new(
            photo_store,
            Arc::new(FolderDirectoryStore::new(Arc::new(EmptyDirectory))),
            Arc::new(ScriptedSelector {
                answer,
                asked: AtomicUsize::new(0),
            }),
            notifier.clone(),
        )
        .with_options(AssignmentOptions {
            refetch_after_assignment: false,
        })
        .with_role_rule(both_roles);
        (coordinator, feed, notifier)
    }

    #[tokio::test]
    async fn test_cancelled_prompt_leaves_drop_without_effect() {
        let (coordinator, feed, notifier) = prompting_coordinator(Answer::Cancel).await;
        let (photo_id, folder_id) = ids();
        let revision = coordinator.photo_store().subscribe();
        let seen = *revision.borrow();
        let before = coordinator.photo_store().get(&photo_id).await.unwrap();

        let err = coordinator
            .handle_drop(photo_id.clone(), folder_id)
            .await
            .unwrap_err();

        assert!(matches!(err, AssignmentError::RoleSelectionCancelled));
        assert_eq!(*revision.borrow(), seen);
        assert!(!revision.has_changed().unwrap());
        assert_eq!(coordinator.photo_store().get(&photo_id).await.unwrap(), before);
        assert_eq!(feed.assign_calls.load(Ordering::SeqCst), 0);
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_prompted_role_flows_into_assignment() {
        let (coordinator, feed, _) = prompting_coordinator(Answer::Pick(PhotoRole::After)).await;
        let (photo_id, folder_id) = ids();

        let receipt = coordinator
            .handle_drop(photo_id.clone(), folder_id)
            .await
            .unwrap();

        assert_eq!(receipt.role, PhotoRole::After);
        assert_eq!(feed.assign_calls.load(Ordering::SeqCst), 1);
        let stored = coordinator.photo_store().get(&photo_id).await.unwrap();
        assert_eq!(stored.assignment_state(), AssignmentState::AssignedAfter);
    }

    #[tokio::test]
    async fn test_single_candidate_skips_prompt() {
        let (coordinator, selector, _) = coordinator(Answer::Cancel);
        let (photo, folder) = ids();

        let role = coordinator
            .select_role(&photo, &folder, &[PhotoRole::After])
            .await
            .unwrap();
        assert_eq!(role, PhotoRole::After);
        assert_eq!(selector.asked.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_prompt_answer_is_used() {
        let (coordinator, selector, _) = coordinator(Answer::Pick(PhotoRole::After));
        let (photo, folder) = ids();

        let role = coordinator.select_role(&photo, &folder, &BOTH).await.unwrap();
        assert_eq!(role, PhotoRole::After);
        assert_eq!(selector.asked.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_prompt_cancel_is_silent() {
        let (coordinator, _, notifier) = coordinator(Answer::Cancel);
        let (photo, folder) = ids();

        let err = coordinator.select_role(&photo, &folder, &BOTH).await.unwrap_err();
        assert!(matches!(err, AssignmentError::RoleSelectionCancelled));
        assert!(err.is_silent());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_prompt_answer_outside_candidates_is_rejected() {
        let (coordinator, _, _) = coordinator(Answer::Pick(PhotoRole::After));
        let (photo, folder) = ids();

        let err = coordinator
            .select_role(&photo, &folder, &[PhotoRole::Before, PhotoRole::Before])
            .await
            .unwrap_err();
        assert!(matches!(err, AssignmentError::InvalidRoleChoice(PhotoRole::After)));
    }

    #[tokio::test]
    async fn test_prompt_failure_notifies() {
        let (coordinator, _, notifier) = coordinator(Answer::Fail);
        let (photo, folder) = ids();

        let err = coordinator.select_role(&photo, &folder, &BOTH).await.unwrap_err();
        assert!(matches!(err, AssignmentError::RoleSelectionFailed(_)));
        assert!(!err.is_silent());

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].is_error());
    }

    #[tokio::test]
    async fn test_detach_during_prompt_discards() {
        let (coordinator, _, notifier) = coordinator(Answer::Fail);
        let (photo, folder) = ids();
        coordinator.detach();

        let err = coordinator.select_role(&photo, &folder, &BOTH).await.unwrap_err();
        assert!(matches!(err, AssignmentError::Discarded));
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_candidates() {
        let (coordinator, _, _) = coordinator(Answer::Cancel);
        let (photo, folder) = ids();

        let err = coordinator.select_role(&photo, &folder, &[]).await.unwrap_err();
        assert!(matches!(err, AssignmentError::NoLegalRole(_)));
    }
}
