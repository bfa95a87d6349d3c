//! Folder directory provider port (driven/secondary port)
//!
//! This module defines the interface for listing candidate target folders
//! and for the "does this folder already have a before photo?" query.
//!
//! ## Design Notes
//!
//! - `has_before_photo` must always reach the server. Another client may
//!   have assigned a "before" photo in the meantime, and a stale answer
//!   would break the before/after pairing of the folder.
//! - The folder set is assumed small enough to list without pagination.

use crate::domain::{Folder, FolderId};

/// Port trait for the remote folder directory
#[async_trait::async_trait]
pub trait IFolderDirectoryProvider: Send + Sync {
    /// Lists folders, optionally narrowed by a server-side search query
    async fn list(&self, search: Option<&str>) -> anyhow::Result<Vec<Folder>>;

    /// Returns true if the folder already holds a "before" photo
    async fn has_before_photo(&self, folder_id: &FolderId) -> anyhow::Result<bool>;
}
