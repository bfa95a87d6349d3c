//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! assignment engine. Ports are interfaces that the core depends on, but
//! whose implementations live in adapter crates (HTTP, terminal, UI).
//!
//! ## Ports Overview
//!
//! - [`IPhotoFeedProvider`] - Paginated photo feed and the assignment mutation
//! - [`IFolderDirectoryProvider`] - Folder listing and the "before photo" precondition
//! - [`INotificationService`] - User-facing success/warning/error messages
//! - [`IRoleSelector`] - User-driven choice between several legal roles

pub mod folder_directory;
pub mod notification;
pub mod photo_feed;
pub mod role_selector;

pub use folder_directory::IFolderDirectoryProvider;
pub use notification::{INotificationService, Notification, NotificationKind};
pub use photo_feed::IPhotoFeedProvider;
pub use role_selector::{FirstCandidateSelector, IRoleSelector};
