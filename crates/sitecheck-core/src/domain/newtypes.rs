//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for domain identifiers and values.
//! Each newtype ensures data validity at construction time, so malformed
//! identifiers coming from drag payloads or server responses are rejected at
//! the boundary instead of reaching the assignment coordinator.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

/// Maximum length accepted for opaque server identifiers
pub const MAX_ID_LEN: usize = 128;

fn validate_opaque_id(kind: &str, id: &str) -> Result<(), DomainError> {
    if id.is_empty() {
        return Err(DomainError::InvalidId(format!("{kind} cannot be empty")));
    }
    if id.len() > MAX_ID_LEN {
        return Err(DomainError::InvalidId(format!(
            "{kind} exceeds {MAX_ID_LEN} characters"
        )));
    }
    // IDs are interpolated into URL paths, so only path-safe characters pass
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '!' || c == '-' || c == '_')
    {
        return Err(DomainError::InvalidId(format!(
            "{kind} contains invalid characters: {id:?}"
        )));
    }
    Ok(())
}

// ============================================================================
// Server-issued identifiers
// ============================================================================

/// Identifier of a photo record, as issued by the server
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhotoId(String);

impl PhotoId {
    /// Create a new PhotoId
    ///
    /// # Errors
    /// Returns error if the ID is empty, too long or contains characters
    /// outside `[A-Za-z0-9!_-]`
    pub fn new(id: String) -> Result<Self, DomainError> {
        validate_opaque_id("Photo ID", &id)?;
        Ok(Self(id))
    }

    /// Get the ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PhotoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PhotoId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for PhotoId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<PhotoId> for String {
    fn from(id: PhotoId) -> Self {
        id.0
    }
}

/// Identifier of a target folder, as issued by the server
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FolderId(String);

impl FolderId {
    /// Create a new FolderId
    ///
    /// # Errors
    /// Returns error if the ID is empty, too long or contains characters
    /// outside `[A-Za-z0-9!_-]`
    pub fn new(id: String) -> Result<Self, DomainError> {
        validate_opaque_id("Folder ID", &id)?;
        Ok(Self(id))
    }

    /// Get the ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FolderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FolderId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for FolderId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<FolderId> for String {
    fn from(id: FolderId) -> Self {
        id.0
    }
}

// ============================================================================
// Client-side identifiers
// ============================================================================

/// Identifier of a single optimistic assignment attempt
///
/// Only used to correlate log lines of one drop gesture; never sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId(Uuid);

impl AssignmentId {
    /// Create a new random AssignmentId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AssignmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for AssignmentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Feed query values
// ============================================================================

/// Inclusive calendar-day bounds used to filter the photo feed
///
/// Either bound may be open. A filter with both bounds open matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DateFilterParts")]
pub struct DateFilter {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

/// Unvalidated wire form of [`DateFilter`]
#[derive(Deserialize)]
struct DateFilterParts {
    #[serde(default)]
    from: Option<NaiveDate>,
    #[serde(default)]
    to: Option<NaiveDate>,
}

impl TryFrom<DateFilterParts> for DateFilter {
    type Error = DomainError;

    fn try_from(parts: DateFilterParts) -> Result<Self, Self::Error> {
        Self::new(parts.from, parts.to)
    }
}

impl DateFilter {
    /// Create a date filter
    ///
    /// # Errors
    /// Returns error if both bounds are set and `from` is after `to`
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, DomainError> {
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(DomainError::InvalidDateRange(format!(
                    "from ({f}) is after to ({t})"
                )));
            }
        }
        Ok(Self { from, to })
    }

    /// A filter that matches every photo
    #[must_use]
    pub const fn any() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    #[must_use]
    pub const fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    #[must_use]
    pub const fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    /// Returns true if neither bound is set
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Returns true if the timestamp's UTC calendar day falls within the bounds
    #[must_use]
    pub fn matches(&self, timestamp: DateTime<Utc>) -> bool {
        let day = timestamp.date_naive();
        self.from.map_or(true, |f| day >= f) && self.to.map_or(true, |t| day <= t)
    }
}

/// Default number of photos per feed page
pub const DEFAULT_PAGE_SIZE: u32 = 24;

/// Maximum number of photos per feed page
pub const MAX_PAGE_SIZE: u32 = 200;

/// A 1-based page of the photo feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PageRequestParts")]
pub struct PageRequest {
    number: u32,
    size: u32,
}

/// Unvalidated wire form of [`PageRequest`]
#[derive(Deserialize)]
struct PageRequestParts {
    number: u32,
    size: u32,
}

impl TryFrom<PageRequestParts> for PageRequest {
    type Error = DomainError;

    fn try_from(parts: PageRequestParts) -> Result<Self, Self::Error> {
        Self::new(parts.number, parts.size)
    }
}

impl PageRequest {
    /// Create a page request
    ///
    /// # Errors
    /// Returns error if `number` is 0 or `size` is outside `1..=MAX_PAGE_SIZE`
    pub fn new(number: u32, size: u32) -> Result<Self, DomainError> {
        if number == 0 {
            return Err(DomainError::InvalidPage(
                "page numbers start at 1".to_string(),
            ));
        }
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(DomainError::InvalidPage(format!(
                "page size must be in range 1..={MAX_PAGE_SIZE}, got {size}"
            )));
        }
        Ok(Self { number, size })
    }

    /// First page with the default size
    #[must_use]
    pub const fn first() -> Self {
        Self {
            number: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }

    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_photo_id_valid() {
        let id = PhotoId::new("ph_01HZX9".to_string()).unwrap();
        assert_eq!(id.as_str(), "ph_01HZX9");
        assert_eq!(id.to_string(), "ph_01HZX9");
    }

    #[test]
    fn test_photo_id_rejects_empty_and_whitespace() {
        assert!(PhotoId::new(String::new()).is_err());
        assert!(PhotoId::new("ph 1".to_string()).is_err());
        assert!(PhotoId::new("ph\n1".to_string()).is_err());
    }

    #[test]
    fn test_ids_reject_path_and_query_characters() {
        for raw in ["f1?x=", "a/b", "../photos/p1", "f1#top", "f1%2F", "f.1", "fé"] {
            assert!(FolderId::new(raw.to_string()).is_err(), "accepted {raw:?}");
            assert!(raw.parse::<PhotoId>().is_err(), "accepted {raw:?}");
        }
        assert!(FolderId::new("01BYE5RZ!6QN3-zw_B".to_string()).is_ok());
    }

    #[test]
    fn test_folder_id_rejects_overlong() {
        let long = "f".repeat(MAX_ID_LEN + 1);
        assert!(FolderId::new(long).is_err());
        assert!(FolderId::new("f".repeat(MAX_ID_LEN)).is_ok());
    }

    #[test]
    fn test_ids_serde_validate() {
        let ok: FolderId = serde_json::from_str("\"fld-42\"").unwrap();
        assert_eq!(ok.as_str(), "fld-42");

        let bad: Result<FolderId, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_date_filter_rejects_inverted_range() {
        let from = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert!(matches!(
            DateFilter::new(Some(from), Some(to)),
            Err(DomainError::InvalidDateRange(_))
        ));
    }

    #[test]
    fn test_date_filter_matches_inclusive_days() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let filter = DateFilter::new(Some(day), Some(day)).unwrap();

        let morning = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 1).unwrap();
        let night = Utc.with_ymd_and_hms(2026, 3, 10, 23, 59, 59).unwrap();
        let next_day = Utc.with_ymd_and_hms(2026, 3, 11, 0, 0, 0).unwrap();

        assert!(filter.matches(morning));
        assert!(filter.matches(night));
        assert!(!filter.matches(next_day));
        assert!(DateFilter::any().matches(next_day));
        assert!(DateFilter::any().is_unbounded());
    }

    #[test]
    fn test_page_request_bounds() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
        assert!(PageRequest::new(1, MAX_PAGE_SIZE + 1).is_err());

        let page = PageRequest::new(3, 50).unwrap();
        assert_eq!(page.number(), 3);
        assert_eq!(page.size(), 50);
        assert_eq!(PageRequest::default().size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_page_request_deserialize_validates() {
        let page: PageRequest = serde_json::from_str(r#"{"number":2,"size":48}"#).unwrap();
        assert_eq!(page, PageRequest::new(2, 48).unwrap());

        assert!(serde_json::from_str::<PageRequest>(r#"{"number":0,"size":48}"#).is_err());
        assert!(serde_json::from_str::<PageRequest>(r#"{"number":1,"size":0}"#).is_err());
    }

    #[test]
    fn test_date_filter_deserialize_validates() {
        let filter: DateFilter =
            serde_json::from_str(r#"{"from":"2026-03-01","to":"2026-03-10"}"#).unwrap();
        assert_eq!(filter.from(), NaiveDate::from_ymd_opt(2026, 3, 1));

        let open: DateFilter = serde_json::from_str("{}").unwrap();
        assert!(open.is_unbounded());

        let inverted = r#"{"from":"2026-03-10","to":"2026-03-01"}"#;
        assert!(serde_json::from_str::<DateFilter>(inverted).is_err());
    }
}
