//! Notification service port (driven/secondary port)
//!
//! This module defines the side channel the assignment coordinator uses to
//! tell the user what happened to a drop: a confirmation, a rollback, or a
//! warning that displayed data may be out of date.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because delivery is adapter-specific (toast,
//!   terminal line, test recorder).
//! - Notifications are fire-and-forget. The coordinator logs delivery
//!   failures and carries on; they never change an assignment's outcome.

use serde::{Deserialize, Serialize};

/// Kind of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// An operation completed
    Success,
    /// The operation completed but displayed data may be out of date
    Warning,
    /// The operation failed and was undone
    Error,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// A message to show to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

/// Port trait for user-facing notifications
#[async_trait::async_trait]
pub trait INotificationService: Send + Sync {
    /// Shows a notification to the user
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()>;
}
