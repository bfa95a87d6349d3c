//! Folder directory endpoints
//!
//! - `GET /folders[?search=]` returns `{ "data": [FolderDto] }`
//! - `GET /folders/{id}/before-photo` returns `{ "has_before_photo": bool }`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use sitecheck_core::domain::{Folder, FolderId};

use crate::client::ApiClient;
use crate::ApiError;

const FOLDERS_PATH: &str = "/folders";

/// Folder record as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderDto {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub zone_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct FolderPage {
    #[serde(default)]
    data: Vec<FolderDto>,
}

#[derive(Debug, Deserialize)]
struct BeforePhotoResponse {
    has_before_photo: bool,
}

impl TryFrom<FolderDto> for Folder {
    type Error = ApiError;

    fn try_from(dto: FolderDto) -> Result<Self, Self::Error> {
        let id = FolderId::new(dto.id)
            .map_err(|e| ApiError::InvalidResponse(format!("folder record: {e}")))?;

        let mut folder = Folder::new(id, dto.title, dto.code, dto.created_at);
        if let Some(project) = dto.project_name {
            folder = folder.with_project_name(project);
        }
        if let Some(zone) = dto.zone_name {
            folder = folder.with_zone_name(zone);
        }
        Ok(folder)
    }
}

/// Lists folders, optionally filtered server-side by title
pub async fn list_folders(
    client: &ApiClient,
    search: Option<&str>,
) -> Result<Vec<Folder>, ApiError> {
    let query: Vec<(&str, String)> = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| vec![("search", s.to_string())])
        .unwrap_or_default();

    let body: FolderPage = client.get_json(FOLDERS_PATH, &query).await?;
    let folders = body
        .data
        .into_iter()
        .map(Folder::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = folders.len(), "Folder directory received");
    Ok(folders)
}

/// Asks whether the folder already holds a "before" photo
pub async fn has_before_photo(
    client: &ApiClient,
    folder_id: &FolderId,
) -> Result<bool, ApiError> {
    let path = format!("{FOLDERS_PATH}/{}/before-photo", folder_id.as_str());
    let body: BeforePhotoResponse = client.get_json(&path, &[]).await?;
    debug!(folder_id = %folder_id, has_before = body.has_before_photo, "Before-photo answered");
    Ok(body.has_before_photo)
}
