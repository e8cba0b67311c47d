//! Domain module
//!
//! Core domain types and business rules.

pub mod context;
pub mod error;
pub mod patch;
pub mod password;
pub mod validation;

pub use context::{CurrentUser, OperationContext};
pub use error::DomainError;
pub use patch::FieldUpdate;
