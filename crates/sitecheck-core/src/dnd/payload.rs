//! Drag payload codec
//!
//! The native drag event only carries a string. Photos are encoded as
//! `sitecheck-photo:<photo-id>`; anything else is rejected before it can
//! reach the coordinator.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::domain::{DomainError, PhotoId};

/// Prefix marking a drag payload as a SiteCheck photo reference
pub const PAYLOAD_PREFIX: &str = "sitecheck-photo:";

/// A validated photo reference extracted from a drag event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DragPayload(PhotoId);

impl DragPayload {
    pub fn new(photo_id: PhotoId) -> Self {
        Self(photo_id)
    }

    pub fn photo_id(&self) -> &PhotoId {
        &self.0
    }

    pub fn into_photo_id(self) -> PhotoId {
        self.0
    }

    /// Wire form placed on the native drag event
    pub fn encode(&self) -> String {
        format!("{PAYLOAD_PREFIX}{}", self.0)
    }

    /// Parses the string read back from the native drop event
    ///
    /// # Errors
    /// Returns `InvalidPayload` for foreign payloads or malformed photo IDs
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let rest = raw
            .trim()
            .strip_prefix(PAYLOAD_PREFIX)
            .ok_or_else(|| DomainError::InvalidPayload(format!("not a photo payload: {raw:?}")))?;

        PhotoId::new(rest.to_string())
            .map(Self)
            .map_err(|e| DomainError::InvalidPayload(e.to_string()))
    }
}

impl Display for DragPayload {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl FromStr for DragPayload {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
