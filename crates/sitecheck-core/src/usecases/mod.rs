//! Use cases (interactors) for SiteCheck
//!
//! Use cases orchestrate domain entities, stores and port interfaces.
//!
//! ## Use Cases
//!
//! - [`AssignmentCoordinator`] - Drag-and-drop photo assignment with
//!   precondition check, optimistic update and rollback

pub mod assign_photo;

pub use assign_photo::{
    AssignmentCoordinator, AssignmentError, AssignmentOptions, AssignmentReceipt,
};
