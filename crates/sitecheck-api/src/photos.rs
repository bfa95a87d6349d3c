//! Photo feed and assignment endpoints
//!
//! - `GET /photos?page=&per_page=&from=&to=` returns `{ "data": [PhotoDto] }`
//! - `POST /photos/{id}/assign` with `{ "folder_id", "role" }` returns the
//!   updated `PhotoDto`
//!
//! The assignment mutation is sent exactly once; a failure is reported to
//! the caller, which rolls back its optimistic update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sitecheck_core::domain::{
    Assignment, AssignmentState, DateFilter, FolderId, PageRequest, Photo, PhotoId, PhotoRole,
};

use crate::client::ApiClient;
use crate::ApiError;

/// Path for the photo feed relative to the API base URL
const PHOTOS_PATH: &str = "/photos";

// ============================================================================
// Wire types
// ============================================================================

/// Photo record as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoDto {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub source_url: String,
    pub assignment_state: AssignmentState,
    #[serde(default)]
    pub assigned_folder_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhotoPage {
    #[serde(default)]
    data: Vec<PhotoDto>,
}

#[derive(Debug, Serialize)]
struct AssignRequest<'a> {
    folder_id: &'a str,
    role: PhotoRole,
}

impl TryFrom<PhotoDto> for Photo {
    type Error = ApiError;

    fn try_from(dto: PhotoDto) -> Result<Self, Self::Error> {
        let invalid = |e: sitecheck_core::domain::DomainError| {
            ApiError::InvalidResponse(format!("photo record: {e}"))
        };

        let id = PhotoId::new(dto.id).map_err(invalid)?;
        let folder_id = dto
            .assigned_folder_id
            .map(FolderId::new)
            .transpose()
            .map_err(invalid)?;
        let assignment = Assignment::from_parts(dto.assignment_state, folder_id).map_err(invalid)?;

        Ok(Photo::new(id, dto.title, dto.created_at, dto.source_url).with_assignment(assignment))
    }
}

fn page_query(page: &PageRequest, filter: Option<&DateFilter>) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("page", page.number().to_string()),
        ("per_page", page.size().to_string()),
    ];
    if let Some(filter) = filter {
        if let Some(from) = filter.from() {
            query.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = filter.to() {
            query.push(("to", to.format("%Y-%m-%d").to_string()));
        }
    }
    query
}

// ============================================================================
// Endpoints
// ============================================================================

/// Fetches one page of the photo feed
///
/// # Errors
/// Returns an [`ApiError`] for transport failures, non-success statuses, or
/// records that violate the assignment invariant
pub async fn list_photos(
    client: &ApiClient,
    page: &PageRequest,
    filter: Option<&DateFilter>,
) -> Result<Vec<Photo>, ApiError> {
    debug!(
        page = page.number(),
        per_page = page.size(),
        "Fetching photo feed page"
    );

    let body: PhotoPage = client
        .get_json(PHOTOS_PATH, &page_query(page, filter))
        .await?;

    let photos = body
        .data
        .into_iter()
        .map(Photo::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = photos.len(), "Photo feed page received");
    Ok(photos)
}

/// Assigns a photo to a folder with the given role
///
/// Returns the photo as stored by the server after the assignment.
pub async fn assign_photo(
    client: &ApiClient,
    photo_id: &PhotoId,
    folder_id: &FolderId,
    role: PhotoRole,
) -> Result<Photo, ApiError> {
    let path = format!("{PHOTOS_PATH}/{}/assign", photo_id.as_str());
    let request = AssignRequest {
        folder_id: folder_id.as_str(),
        role,
    };

    let dto: PhotoDto = client.post_json(&path, &request).await?;
    let photo = Photo::try_from(dto)?;

    info!(
        photo_id = %photo_id,
        folder_id = %folder_id,
        role = %role,
        server_state = %photo.assignment_state(),
        "Photo assignment accepted by server"
    );
    Ok(photo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dto(state: AssignmentState, folder: Option<&str>) -> PhotoDto {
        PhotoDto {
            id: "p1".to_string(),
            title: "North facade".to_string(),
            created_at: "2024-05-01T08:00:00Z".parse().unwrap(),
            source_url: "https://cdn.example.com/p1.jpg".to_string(),
            assignment_state: state,
            assigned_folder_id: folder.map(str::to_string),
        }
    }

    #[test]
    fn test_dto_to_photo() {
        let photo = Photo::try_from(dto(AssignmentState::AssignedAfter, Some("f1"))).unwrap();
        assert_eq!(photo.id().as_str(), "p1");
        assert_eq!(photo.title(), "North facade");
        assert_eq!(photo.assignment_state(), AssignmentState::AssignedAfter);
        assert_eq!(photo.assigned_folder_id().map(|f| f.as_str()), Some("f1"));

        let photo = Photo::try_from(dto(AssignmentState::Unassigned, None)).unwrap();
        assert!(photo.is_unassigned());
    }

    #[test]
    fn test_dto_violating_invariant_is_rejected() {
        let err = Photo::try_from(dto(AssignmentState::Unassigned, Some("f1"))).unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));

        let err = Photo::try_from(dto(AssignmentState::AssignedBefore, None)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn test_dto_parses_server_json() {
        let json = r#"{
            "id": "p9",
            "created_at": "2024-05-02T10:15:00Z",
            "source_url": "https://cdn.example.com/p9.jpg",
            "assignment_state": "assigned_before",
            "assigned_folder_id": "f3"
        }"#;
        let dto: PhotoDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.title, "");
        let photo = Photo::try_from(dto).unwrap();
        assert_eq!(photo.assignment_state(), AssignmentState::AssignedBefore);
    }

    #[test]
    fn test_page_query() {
        let page = PageRequest::new(3, 50).unwrap();
        assert_eq!(
            page_query(&page, None),
            vec![("page", "3".to_string()), ("per_page", "50".to_string())]
        );

        let filter = DateFilter::new(
            NaiveDate::from_ymd_opt(2024, 5, 1),
            NaiveDate::from_ymd_opt(2024, 5, 31),
        )
        .unwrap();
        let query = page_query(&page, Some(&filter));
        assert!(query.contains(&("from", "2024-05-01".to_string())));
        assert!(query.contains(&("to", "2024-05-31".to_string())));
    }

    #[test]
    fn test_assign_request_body() {
        let body = AssignRequest {
            folder_id: "f1",
            role: PhotoRole::Before,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"folder_id": "f1", "role": "before"})
        );
    }
}
