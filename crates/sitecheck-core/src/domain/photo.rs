//! Photo domain entity
//!
//! A photo arrives in the inbox feed unassigned and, through a drop onto a
//! folder, becomes that folder's "before" or "after" documentation.
//!
//! ## Assignment lifecycle
//!
//! ```text
//!   ┌────────────┐   drop (no before yet)   ┌──────────────────┐
//!   │ Unassigned │ ───────────────────────► │ AssignedBefore(F)│
//!   └────────────┘                          └──────────────────┘
//!         │
//!         │        drop (before exists)     ┌──────────────────┐
//!         └───────────────────────────────► │ AssignedAfter(F) │
//!                                           └──────────────────┘
//! ```
//!
//! Assigned photos are not re-assignable through the drop flow. The only way
//! back to `Unassigned` is a rollback of a failed optimistic update, or a
//! server refetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::DomainError;
use super::newtypes::{FolderId, PhotoId};

// ============================================================================
// Roles and flat assignment state
// ============================================================================

/// Role a photo holds within a folder once assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoRole {
    /// Documents the site before the intervention
    Before,
    /// Documents the site after the intervention
    After,
}

impl PhotoRole {
    /// Returns the assignment state a photo enters when given this role
    pub fn as_state(&self) -> AssignmentState {
        match self {
            PhotoRole::Before => AssignmentState::AssignedBefore,
            PhotoRole::After => AssignmentState::AssignedAfter,
        }
    }

    /// Roles a folder can legally accept next
    ///
    /// A folder without a "before" photo only accepts `Before`; once it has
    /// one, it only accepts `After`.
    pub fn candidates_for(has_before_photo: bool) -> Vec<PhotoRole> {
        if has_before_photo {
            vec![PhotoRole::After]
        } else {
            vec![PhotoRole::Before]
        }
    }
}

impl fmt::Display for PhotoRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoRole::Before => write!(f, "before"),
            PhotoRole::After => write!(f, "after"),
        }
    }
}

impl FromStr for PhotoRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "before" => Ok(PhotoRole::Before),
            "after" => Ok(PhotoRole::After),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}

/// Flat view of a photo's assignment, as exchanged with the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentState {
    /// In the inbox, not attached to any folder
    #[default]
    Unassigned,
    /// Attached to a folder as its "before" photo
    AssignedBefore,
    /// Attached to a folder as an "after" photo
    AssignedAfter,
}

impl AssignmentState {
    /// Returns the role for assigned states
    pub fn role(&self) -> Option<PhotoRole> {
        match self {
            AssignmentState::Unassigned => None,
            AssignmentState::AssignedBefore => Some(PhotoRole::Before),
            AssignmentState::AssignedAfter => Some(PhotoRole::After),
        }
    }

    /// Returns the state name as a string
    pub fn name(&self) -> &'static str {
        match self {
            AssignmentState::Unassigned => "Unassigned",
            AssignmentState::AssignedBefore => "AssignedBefore",
            AssignmentState::AssignedAfter => "AssignedAfter",
        }
    }
}

impl fmt::Display for AssignmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentState::Unassigned => write!(f, "unassigned"),
            AssignmentState::AssignedBefore => write!(f, "assigned_before"),
            AssignmentState::AssignedAfter => write!(f, "assigned_after"),
        }
    }
}

impl FromStr for AssignmentState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unassigned" => Ok(AssignmentState::Unassigned),
            "assigned_before" | "before" => Ok(AssignmentState::AssignedBefore),
            "assigned_after" | "after" => Ok(AssignmentState::AssignedAfter),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}

// ============================================================================
// Assignment
// ============================================================================

/// Where a photo is attached, if anywhere
///
/// Holding the folder inside the assigned variant keeps
/// `Unassigned ⇔ no folder` true by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Assignment {
    #[default]
    Unassigned,
    Assigned { folder_id: FolderId, role: PhotoRole },
}

impl Assignment {
    /// Builds an assignment from the flat server representation
    ///
    /// # Errors
    /// Returns `InvalidAssignment` if the state and folder disagree
    pub fn from_parts(
        state: AssignmentState,
        folder_id: Option<FolderId>,
    ) -> Result<Self, DomainError> {
        match (state.role(), folder_id) {
            (None, None) => Ok(Assignment::Unassigned),
            (Some(role), Some(folder_id)) => Ok(Assignment::Assigned { folder_id, role }),
            (None, Some(folder_id)) => Err(DomainError::InvalidAssignment(format!(
                "unassigned photo references folder {folder_id}"
            ))),
            (Some(role), None) => Err(DomainError::InvalidAssignment(format!(
                "photo assigned as {role} without a folder"
            ))),
        }
    }

    pub fn state(&self) -> AssignmentState {
        match self {
            Assignment::Unassigned => AssignmentState::Unassigned,
            Assignment::Assigned { role, .. } => role.as_state(),
        }
    }

    pub fn folder_id(&self) -> Option<&FolderId> {
        match self {
            Assignment::Unassigned => None,
            Assignment::Assigned { folder_id, .. } => Some(folder_id),
        }
    }

    pub fn role(&self) -> Option<PhotoRole> {
        match self {
            Assignment::Unassigned => None,
            Assignment::Assigned { role, .. } => Some(*role),
        }
    }
}

// ============================================================================
// Photo
// ============================================================================

/// A photo record from the inbox feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    id: PhotoId,
    title: String,
    created_at: DateTime<Utc>,
    source_url: String,
    assignment: Assignment,
}

impl Photo {
    /// Creates a new unassigned photo
    pub fn new(
        id: PhotoId,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            created_at,
            source_url: source_url.into(),
            assignment: Assignment::Unassigned,
        }
    }

    /// Returns a copy of this photo with the given assignment
    #[must_use]
    pub fn with_assignment(mut self, assignment: Assignment) -> Self {
        self.assignment = assignment;
        self
    }

    pub fn id(&self) -> &PhotoId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn assignment_state(&self) -> AssignmentState {
        self.assignment.state()
    }

    pub fn assigned_folder_id(&self) -> Option<&FolderId> {
        self.assignment.folder_id()
    }

    /// Returns true if the photo is still in the inbox
    pub fn is_unassigned(&self) -> bool {
        matches!(self.assignment, Assignment::Unassigned)
    }

    /// Attaches the photo to a folder in the given role
    ///
    /// # Errors
    /// Returns `InvalidState` if the photo is already assigned
    pub(crate) fn assign(&mut self, folder_id: FolderId, role: PhotoRole) -> Result<(), DomainError> {
        if !self.is_unassigned() {
            return Err(DomainError::InvalidState {
                from: self.assignment_state().name().to_string(),
                to: role.as_state().name().to_string(),
            });
        }
        self.assignment = Assignment::Assigned { folder_id, role };
        Ok(())
    }
}
