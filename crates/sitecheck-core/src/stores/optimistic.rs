//! Two-phase optimistic assignment
//!
//! [`OptimisticAssignment`] is the handle returned once an assignment has
//! been applied locally. It must end in exactly one of:
//! - [`commit`](OptimisticAssignment::commit) once the server confirms,
//! - [`abort`](OptimisticAssignment::abort) when the server rejects,
//! - [`abandon`](OptimisticAssignment::abandon) when the caller has gone
//!   away and the next refetch should settle the record.

use tracing::debug;

use crate::domain::{PendingAssignment, Photo};

use super::photo_feed::PhotoFeedStore;

/// An optimistic assignment awaiting server confirmation
#[must_use = "an optimistic assignment must be committed, aborted or abandoned"]
pub(crate) struct OptimisticAssignment<'a> {
    store: &'a PhotoFeedStore,
    pending: PendingAssignment,
}

impl<'a> OptimisticAssignment<'a> {
    pub(crate) fn new(store: &'a PhotoFeedStore, pending: PendingAssignment) -> Self {
        Self { store, pending }
    }

    pub(crate) fn pending(&self) -> &PendingAssignment {
        &self.pending
    }

    /// Keeps the assignment, adopting the server's copy when one is given
    ///
    /// Returns true if the server copy replaced the optimistic record.
    pub(crate) async fn commit(self, confirmed: Option<Photo>) -> bool {
        debug!(
            assignment_id = %self.pending.id(),
            elapsed_ms = self.pending.elapsed_ms(),
            "Committing optimistic assignment"
        );
        match confirmed {
            Some(photo) => self.store.confirm(&self.pending, photo).await,
            None => false,
        }
    }

    /// Restores the photo to its pre-drop snapshot
    ///
    /// Returns true if the store was changed.
    pub(crate) async fn abort(self) -> bool {
        debug!(
            assignment_id = %self.pending.id(),
            elapsed_ms = self.pending.elapsed_ms(),
            "Aborting optimistic assignment"
        );
        self.store.revert(&self.pending).await
    }

    /// Leaves the optimistic record as is
    pub(crate) fn abandon(self) -> PendingAssignment {
        debug!(
            assignment_id = %self.pending.id(),
            "Abandoning optimistic assignment until next refetch"
        );
        self.pending
    }
}
