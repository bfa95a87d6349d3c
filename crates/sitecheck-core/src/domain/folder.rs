//! Folder domain entity
//!
//! Folders are the drop targets of the assignment flow. They carry
//! denormalized project and zone names for display only; the assignment
//! engine never creates, renames or deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::FolderId;

/// A target folder for photo assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    id: FolderId,
    title: String,
    code: String,
    project_name: Option<String>,
    zone_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl Folder {
    pub fn new(
        id: FolderId,
        title: impl Into<String>,
        code: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            code: code.into(),
            project_name: None,
            zone_name: None,
            created_at,
        }
    }

    /// Sets the denormalized project name
    #[must_use]
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Sets the denormalized zone name
    #[must_use]
    pub fn with_zone_name(mut self, name: impl Into<String>) -> Self {
        self.zone_name = Some(name.into());
        self
    }

    pub fn id(&self) -> &FolderId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    pub fn zone_name(&self) -> Option<&str> {
        self.zone_name.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Label shown on the drop target, e.g. `"F-012 - Stairwell B (Tower 2 / Level 3)"`
    pub fn display_label(&self) -> String {
        let location = match (self.project_name(), self.zone_name()) {
            (Some(project), Some(zone)) => format!(" ({project} / {zone})"),
            (Some(project), None) => format!(" ({project})"),
            (None, Some(zone)) => format!(" ({zone})"),
            (None, None) => String::new(),
        };
        format!("{} - {}{}", self.code, self.title, location)
    }

    /// Substring match over the title
    pub fn title_matches(&self, query: &str, case_sensitive: bool) -> bool {
        if case_sensitive {
            self.title.contains(query)
        } else {
            self.title.to_lowercase().contains(&query.to_lowercase())
        }
    }
}
