//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

/// Domain-specific errors
///
/// Validation failures and authorization rule violations. They are raised
/// before any write reaches the database and are independent of the web layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Input field failed its length/format constraint
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Only the organizer may modify the event
    #[error("Not enough permissions")]
    NotOrganizer,

    /// Only the owner (or a superuser) may access the item
    #[error("Not enough permissions")]
    NotOwner,

    /// Operation restricted to superusers
    #[error("The user doesn't have enough privileges")]
    SuperuserRequired,

    /// Superusers cannot remove their own account
    #[error("Super users are not allowed to delete themselves")]
    SuperuserSelfDelete,

    /// The user already holds a registration for the event
    #[error("User is already registered for this event")]
    AlreadyRegistered,

    /// Email address belongs to another user
    #[error("The user with this email already exists in the system")]
    EmailTaken,

    /// Current password did not verify
    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("New password cannot be the same as the current one")]
    PasswordUnchanged,
}

impl DomainError {
    /// Create an invalid field error
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}
