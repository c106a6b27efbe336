//! Sketch engine errors
//!
//! None of these are fatal to the host. Pick misses and invalid transitions
//! are absorbed; an insufficient-vertices error is shown to the user and the
//! sketch stays open.

use thiserror::Error;

use crate::SketchState;

/// Sketch-related errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SketchError {
    #[error("No surface under the pointer")]
    PickMiss,

    #[error("Closing a polygon needs at least {required} points, only {actual} placed")]
    InsufficientVertices { required: usize, actual: usize },

    #[error("Cannot handle {event} while {state}")]
    InvalidTransition {
        state: SketchState,
        event: &'static str,
    },

    #[error("Invalid filter color: {0}")]
    InvalidColor(String),
}

impl SketchError {
    /// Whether the host should surface this error to the user
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            SketchError::InsufficientVertices { .. } | SketchError::InvalidColor(_)
        )
    }
}
