//! Domain entities and business logic
//!
//! This module contains the core domain types for SiteCheck photo assignment:
//! - Newtypes for validated identifiers and feed query values
//! - Photo records with their before/after assignment
//! - Folder records used as drop targets
//! - The transient pending-assignment snapshot used for rollback
//! - Domain-specific error types

pub mod assignment;
pub mod errors;
pub mod folder;
pub mod newtypes;
pub mod photo;

// Re-export commonly used types
pub use assignment::PendingAssignment;
pub use errors::DomainError;
pub use folder::Folder;
pub use newtypes::*;
pub use photo::{Assignment, AssignmentState, Photo, PhotoRole};
