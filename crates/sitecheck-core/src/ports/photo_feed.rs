//! Photo feed provider port (driven/secondary port)
//!
//! This module defines the interface to the server-side photo feed: the
//! paginated, date-filterable listing, and the assignment mutation that the
//! coordinator confirms optimistic updates against.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because transport errors are adapter-specific.
//!   Adapters should still surface a typed error inside the `anyhow::Error`
//!   so callers can downcast when they need to distinguish a rejection from
//!   a network failure.
//! - Implementations must not retry `assign` on their own: the mutation has
//!   no idempotency key, and retry is left to the user repeating the gesture.
//! - Timeouts, if any, are enforced by the implementation's HTTP client.

use crate::domain::{DateFilter, FolderId, PageRequest, Photo, PhotoId, PhotoRole};

/// Port trait for the remote photo feed
#[async_trait::async_trait]
pub trait IPhotoFeedProvider: Send + Sync {
    /// Lists one page of photos, most recent first
    ///
    /// # Arguments
    /// * `page` - 1-based page number and page size
    /// * `filter` - Optional inclusive day bounds on the creation timestamp
    async fn list(&self, page: &PageRequest, filter: Option<&DateFilter>)
        -> anyhow::Result<Vec<Photo>>;

    /// Assigns a photo to a folder in the given role
    ///
    /// # Returns
    /// The photo record as stored by the server after the assignment
    async fn assign(
        &self,
        photo_id: &PhotoId,
        folder_id: &FolderId,
        role: PhotoRole,
    ) -> anyhow::Result<Photo>;
}
