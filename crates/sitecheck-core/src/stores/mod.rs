//! Client-side state containers
//!
//! The stores hold what the user currently sees and are passed explicitly
//! to the coordinator and to whatever renders them. Both publish a revision
//! counter through a `tokio::sync::watch` channel.
//!
//! - [`PhotoFeedStore`] - current page of the photo feed, with the optimistic
//!   assignment primitive
//! - [`FolderDirectoryStore`] - full folder list and the uncached
//!   "before photo" precondition

pub mod folder_directory;
mod optimistic;
pub mod photo_feed;

pub use folder_directory::FolderDirectoryStore;
pub use photo_feed::PhotoFeedStore;
