//! event_hub Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
mod error;
pub mod handlers;
pub mod model;
pub mod repository;

pub use config::Config;
pub use domain::{CurrentUser, DomainError, FieldUpdate, OperationContext};
pub use error::{AppError, AppResult, ErrorResponse};
