//! Drag-and-drop surfaces
//!
//! UI-agnostic state machines for the two ends of the drag gesture. They
//! carry no business state beyond transient flags; the only business effect
//! is [`DropTarget::drop_into`], which hands a validated drop to the
//! [`AssignmentCoordinator`](crate::usecases::AssignmentCoordinator).
//!
//! - [`DragPayload`] - typed form of the untyped string carried by the native drag event
//! - [`DragSource`] - per-photo `Idle → Dragging → (dropped | outside | cancelled)` machine
//! - [`DropTarget`] - per-folder drop zone with a visual `is_drag_over` flag

pub mod drag_source;
pub mod drop_target;
pub mod payload;

pub use drag_source::{DragSource, DragState};
pub use drop_target::{DropRequest, DropTarget};
pub use payload::{DragPayload, PAYLOAD_PREFIX};
