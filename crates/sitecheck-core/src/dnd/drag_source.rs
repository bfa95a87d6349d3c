//! Drag source state machine
//!
//! One [`DragSource`] per rendered photo tile. The source only emits the
//! payload and tracks the gesture for visual feedback; it never mutates
//! the photo.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Photo, PhotoId};

use super::payload::DragPayload;

/// Lifecycle of a single drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragState {
    /// No gesture in progress
    #[default]
    Idle,
    /// Payload emitted, pointer moving
    Dragging,
    /// Released over a drop target that accepted the payload
    DroppedOnValidTarget,
    /// Released over something that is not a drop target
    DroppedOutside,
    /// Gesture aborted (escape key, window lost focus)
    Cancelled,
}

impl DragState {
    pub fn name(&self) -> &'static str {
        match self {
            DragState::Idle => "Idle",
            DragState::Dragging => "Dragging",
            DragState::DroppedOnValidTarget => "DroppedOnValidTarget",
            DragState::DroppedOutside => "DroppedOutside",
            DragState::Cancelled => "Cancelled",
        }
    }

    /// Returns true for the three end-of-gesture states
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DragState::DroppedOnValidTarget | DragState::DroppedOutside | DragState::Cancelled
        )
    }
}

impl Display for DragState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Drag handle attached to a photo tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSource {
    photo_id: PhotoId,
    draggable: bool,
    state: DragState,
}

impl DragSource {
    /// Creates the source for a photo; only unassigned photos are draggable
    pub fn for_photo(photo: &Photo) -> Self {
        Self {
            photo_id: photo.id().clone(),
            draggable: photo.is_unassigned(),
            state: DragState::Idle,
        }
    }

    pub fn photo_id(&self) -> &PhotoId {
        &self.photo_id
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Transient visual flag, true only while the pointer is moving
    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    /// Re-evaluates draggability after the store re-rendered the photo
    ///
    /// An in-flight gesture is left alone; it ends through the normal
    /// transitions and the coordinator re-checks the photo on drop.
    pub fn refresh(&mut self, photo: &Photo) {
        if photo.id() == &self.photo_id {
            self.draggable = photo.is_unassigned();
        }
    }

    pub fn can_transition_to(&self, target: DragState) -> bool {
        match (self.state, target) {
            (DragState::Idle, DragState::Dragging) => self.draggable,
            (DragState::Dragging, DragState::DroppedOnValidTarget) => true,
            (DragState::Dragging, DragState::DroppedOutside) => true,
            (DragState::Dragging, DragState::Cancelled) => true,
            (from, DragState::Idle) => from.is_terminal(),
            _ => false,
        }
    }

    fn transition_to(&mut self, target: DragState) -> Result<(), DomainError> {
        if !self.can_transition_to(target) {
            return Err(DomainError::InvalidState {
                from: self.state.name().to_string(),
                to: target.name().to_string(),
            });
        }
        self.state = target;
        Ok(())
    }

    /// Starts a gesture and returns the payload to place on the drag event
    ///
    /// # Errors
    /// Returns `InvalidState` when the photo is not draggable or a gesture
    /// is already in progress
    pub fn begin_drag(&mut self) -> Result<DragPayload, DomainError> {
        self.transition_to(DragState::Dragging)?;
        Ok(DragPayload::new(self.photo_id.clone()))
    }

    pub fn drop_on_target(&mut self) -> Result<(), DomainError> {
        self.transition_to(DragState::DroppedOnValidTarget)
    }

    pub fn drop_outside(&mut self) -> Result<(), DomainError> {
        self.transition_to(DragState::DroppedOutside)
    }

    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.transition_to(DragState::Cancelled)
    }

    /// Returns a finished gesture to `Idle`; a no-op when already idle
    pub fn reset(&mut self) -> Result<(), DomainError> {
        if self.state == DragState::Idle {
            return Ok(());
        }
        self.transition_to(DragState::Idle)
    }
}
