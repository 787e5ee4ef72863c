//! Error taxonomy for the booking core.
//!
//! Every engine operation resolves to either an updated booking or one of
//! these typed errors. A failed operation leaves the booking exactly as it
//! was before the attempt.

use thiserror::Error;

/// Errors surfaced by the booking engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// The referenced booking or service does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The acting party lacks the role or ownership required for the action
    #[error("actor is not allowed to perform this action")]
    Unauthorized,

    /// The action is not valid from the current state
    #[error("invalid transition: {action} is not valid from {from}")]
    InvalidTransition {
        /// State the booking (or sub-record) was in when the action arrived
        from: String,
        /// The action that was attempted
        action: String,
    },

    /// The target slot is already held by another active booking
    #[error("slot is already held by another booking")]
    SlotConflict,

    /// Malformed date, slot, contact data, or amount
    #[error("validation failed: {0}")]
    Validation(String),

    /// Concurrent modification detected; the caller may re-check and retry
    #[error("concurrent modification detected")]
    PersistenceConflict,
}

impl BookingError {
    /// Whether the caller may re-check availability and retry the operation.
    ///
    /// `SlotConflict` and `PersistenceConflict` are transient outcomes of
    /// racing callers; the rest are terminal for the request.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::SlotConflict | Self::PersistenceConflict)
    }

    /// Shorthand for a [`BookingError::NotFound`] with a formatted subject.
    #[must_use]
    pub fn not_found(subject: impl Into<String>) -> Self {
        Self::NotFound(subject.into())
    }

    /// Shorthand for a [`BookingError::Validation`] with a formatted message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for a [`BookingError::InvalidTransition`].
    #[must_use]
    pub fn invalid_transition(from: impl std::fmt::Display, action: impl Into<String>) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            action: action.into(),
        }
    }
}
