//! Pending assignment record
//!
//! Captures everything needed to undo one optimistic assignment: the photo's
//! exact state before the drop, and the store epoch the update was applied
//! in. It lives only for the duration of the optimistic window and is never
//! persisted.

use chrono::{DateTime, Utc};

use super::newtypes::{AssignmentId, FolderId, PhotoId};
use super::photo::{Photo, PhotoRole};

/// Transient record of an optimistic assignment awaiting server confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAssignment {
    id: AssignmentId,
    target_folder_id: FolderId,
    role: PhotoRole,
    previous: Photo,
    epoch: u64,
    started_at: DateTime<Utc>,
}

impl PendingAssignment {
    pub fn new(previous: Photo, target_folder_id: FolderId, role: PhotoRole, epoch: u64) -> Self {
        Self {
            id: AssignmentId::new(),
            target_folder_id,
            role,
            previous,
            epoch,
            started_at: Utc::now(),
        }
    }

    pub fn id(&self) -> AssignmentId {
        self.id
    }

    pub fn photo_id(&self) -> &PhotoId {
        self.previous.id()
    }

    pub fn target_folder_id(&self) -> &FolderId {
        &self.target_folder_id
    }

    pub fn role(&self) -> PhotoRole {
        self.role
    }

    /// Snapshot of the photo immediately before the optimistic update
    pub fn previous(&self) -> &Photo {
        &self.previous
    }

    /// Store epoch in which the optimistic update was applied
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Milliseconds elapsed since the optimistic update was applied
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}
