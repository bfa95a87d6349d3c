//! SiteCheck Core - Photo-to-folder assignment engine
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `Photo`, `Folder`, `Assignment`, `PendingAssignment`
//! - **Stores** - `PhotoFeedStore` (with the optimistic assignment primitive), `FolderDirectoryStore`
//! - **Use cases** - `AssignmentCoordinator`, which turns a drop into a confirmed or rolled-back assignment
//! - **Port definitions** - Traits for adapters: `IPhotoFeedProvider`, `IFolderDirectoryProvider`,
//!   `INotificationService`, `IRoleSelector`
//! - **Drag/drop surfaces** - `DragSource` and `DropTarget` state machines
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates implement.
//! Stores hold client-side state and only the coordinator mutates it in place.

pub mod config;
pub mod dnd;
pub mod domain;
pub mod ports;
pub mod stores;
pub mod usecases;
