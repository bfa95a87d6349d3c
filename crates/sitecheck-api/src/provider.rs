//! Provider port implementations backed by the SiteCheck API
//!
//! Thin wrappers that delegate to the [`photos`](crate::photos) and
//! [`folders`](crate::folders) modules and attach context to errors. The
//! original [`ApiError`](crate::ApiError) stays reachable through
//! `anyhow::Error::downcast_ref`.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use sitecheck_core::domain::{
    DateFilter, Folder, FolderId, PageRequest, Photo, PhotoId, PhotoRole,
};
use sitecheck_core::ports::{IFolderDirectoryProvider, IPhotoFeedProvider};

use crate::client::ApiClient;
use crate::{folders, photos};

// ============================================================================
// HttpPhotoFeedProvider
// ============================================================================

/// Photo feed provider that talks to the SiteCheck API
pub struct HttpPhotoFeedProvider {
    client: Arc<ApiClient>,
}

impl HttpPhotoFeedProvider {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl IPhotoFeedProvider for HttpPhotoFeedProvider {
    async fn list(&self, page: &PageRequest, filter: Option<&DateFilter>) -> Result<Vec<Photo>> {
        debug!(page = page.number(), "HttpPhotoFeedProvider::list");
        photos::list_photos(&self.client, page, filter)
            .await
            .with_context(|| format!("Failed to fetch photo page {}", page.number()))
    }

    /// Sends the assignment mutation once; never retried
    async fn assign(
        &self,
        photo_id: &PhotoId,
        folder_id: &FolderId,
        role: PhotoRole,
    ) -> Result<Photo> {
        debug!(
            photo_id = %photo_id,
            folder_id = %folder_id,
            role = %role,
            "HttpPhotoFeedProvider::assign"
        );
        photos::assign_photo(&self.client, photo_id, folder_id, role)
            .await
            .context("Assignment request failed")
    }
}

// ============================================================================
// HttpFolderDirectoryProvider
// ============================================================================

/// Folder directory provider that talks to the SiteCheck API
pub struct HttpFolderDirectoryProvider {
    client: Arc<ApiClient>,
}

impl HttpFolderDirectoryProvider {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl IFolderDirectoryProvider for HttpFolderDirectoryProvider {
    async fn list(&self, search: Option<&str>) -> Result<Vec<Folder>> {
        debug!(search, "HttpFolderDirectoryProvider::list");
        folders::list_folders(&self.client, search)
            .await
            .context("Failed to fetch folder directory")
    }

    async fn has_before_photo(&self, folder_id: &FolderId) -> Result<bool> {
        folders::has_before_photo(&self.client, folder_id)
            .await
            .with_context(|| format!("Failed to query before photo of folder {folder_id}"))
    }
}
