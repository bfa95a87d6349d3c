//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! including identifier validation, assignment invariants, and
//! invalid state transitions of the drag/drop surfaces.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Identifier is empty, too long or contains forbidden characters
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Drag payload could not be parsed into a photo reference
    #[error("Invalid drag payload: {0}")]
    InvalidPayload(String),

    /// Assignment state and assigned folder disagree
    #[error("Invalid assignment: {0}")]
    InvalidAssignment(String),

    /// Invalid state transition attempt
    #[error("Invalid state transition from {from} to {to}")]
    InvalidState {
        /// The current state
        from: String,
        /// The attempted target state
        to: String,
    },

    /// Date filter with `from` after `to`
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// Page number or page size out of range
    #[error("Invalid page request: {0}")]
    InvalidPage(String),

    /// Unknown assignment role or state name
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
