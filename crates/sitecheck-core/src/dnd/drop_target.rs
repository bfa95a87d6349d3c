//! Drop target surface
//!
//! One [`DropTarget`] per rendered folder. It validates the incoming
//! payload, clears its hover flag, and forwards the drop to the
//! coordinator. Malformed payloads never reach the coordinator.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::{DomainError, Folder, FolderId, PhotoId};
use crate::usecases::{AssignmentCoordinator, AssignmentError, AssignmentReceipt};

use super::payload::DragPayload;

/// A validated drop ready for the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropRequest {
    pub photo_id: PhotoId,
    pub folder_id: FolderId,
}

/// Drop zone attached to a folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    folder_id: FolderId,
    drag_over: bool,
}

impl DropTarget {
    pub fn new(folder_id: FolderId) -> Self {
        Self {
            folder_id,
            drag_over: false,
        }
    }

    pub fn for_folder(folder: &Folder) -> Self {
        Self::new(folder.id().clone())
    }

    pub fn folder_id(&self) -> &FolderId {
        &self.folder_id
    }

    /// Visual hover flag
    pub fn is_drag_over(&self) -> bool {
        self.drag_over
    }

    pub fn drag_enter(&mut self) {
        self.drag_over = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_over = false;
    }

    /// Accepts a native drop carrying `raw` as its payload
    ///
    /// The hover flag is cleared whether or not the payload is valid.
    ///
    /// # Errors
    /// Returns `InvalidPayload` if `raw` is not a photo payload
    pub fn drop(&mut self, raw: &str) -> Result<DropRequest, DomainError> {
        self.drag_over = false;
        let payload = DragPayload::parse(raw).map_err(|e| {
            debug!(folder_id = %self.folder_id, error = %e, "Ignoring drop with foreign payload");
            e
        })?;

        Ok(DropRequest {
            photo_id: payload.into_photo_id(),
            folder_id: self.folder_id.clone(),
        })
    }

    /// Accepts a native drop and dispatches it to the coordinator
    ///
    /// Returns the spawned task handle; callers that only render the stores
    /// can drop it.
    ///
    /// # Errors
    /// Returns `InvalidPayload` if `raw` is not a photo payload, in which
    /// case nothing is dispatched
    pub fn drop_into(
        &mut self,
        raw: &str,
        coordinator: &Arc<AssignmentCoordinator>,
    ) -> Result<JoinHandle<Result<AssignmentReceipt, AssignmentError>>, DomainError> {
        let request = self.drop(raw)?;
        Ok(coordinator.dispatch_drop(request.photo_id, request.folder_id))
    }
}
