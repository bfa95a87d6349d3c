//! Role selection port (driving port, user-facing)
//!
//! When a folder could accept a photo in more than one role, the coordinator
//! suspends on this port until the user picks a role or cancels. Under the
//! current before/after rule exactly one role is legal at a time, so the
//! coordinator only calls `ask` when that changes.

use crate::domain::{FolderId, PhotoId, PhotoRole};

/// Port trait for asking the user which role a dropped photo should take
#[async_trait::async_trait]
pub trait IRoleSelector: Send + Sync {
    /// Asks the user to choose among `candidates`
    ///
    /// # Returns
    /// `Some(role)` with the chosen role, or `None` if the user cancelled
    async fn ask(
        &self,
        photo_id: &PhotoId,
        folder_id: &FolderId,
        candidates: &[PhotoRole],
    ) -> anyhow::Result<Option<PhotoRole>>;
}

/// Non-interactive selector that always takes the first candidate
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstCandidateSelector;

#[async_trait::async_trait]
impl IRoleSelector for FirstCandidateSelector {
    async fn ask(
        &self,
        _photo_id: &PhotoId,
        _folder_id: &FolderId,
        candidates: &[PhotoRole],
    ) -> anyhow::Result<Option<PhotoRole>> {
        Ok(candidates.first().copied())
    }
}
