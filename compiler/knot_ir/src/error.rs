//! Errors raised by host procedures.
//!
//! Predicates, transforms, record accessors and slot getters/setters all
//! report failures as `ProcError`. The matcher never inspects or rewraps
//! them; they reach the caller exactly as the procedure produced them.

use crate::{Arity, Name};

/// Failure of a procedure call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProcError {
    /// Called with the wrong number of arguments.
    #[error("{procedure}: expected {expected} argument(s), got {got}")]
    Arity {
        procedure: Name,
        expected: Arity,
        got: usize,
    },

    /// An argument had the wrong type.
    #[error("{procedure}: expected {expected}, got {got}")]
    WrongType {
        procedure: Name,
        expected: &'static str,
        got: &'static str,
    },

    /// A setter was requested for a value that has no backing slot.
    #[error("{procedure}: value is not stored in a settable slot")]
    ReadOnlySlot { procedure: Name },

    /// Host-defined failure.
    #[error("{message}")]
    Custom { message: String },
}

impl ProcError {
    /// Host-defined failure with a free-form message.
    pub fn custom(message: impl Into<String>) -> Self {
        ProcError::Custom {
            message: message.into(),
        }
    }
}
