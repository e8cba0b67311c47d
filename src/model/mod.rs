//! Entity models
//!
//! Database rows plus the create/update/public shapes of each entity.

mod datetime;
mod event;
mod item;
mod registration;
mod user;

pub use event::{Event, EventCreate, EventPublic, EventUpdate};
pub use item::{Item, ItemCreate, ItemPublic, ItemUpdate};
pub use registration::EventRegistration;
pub use user::{
    UpdatePassword, User, UserCreate, UserPublic, UserRegister, UserUpdate, UserUpdateMe,
};

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A page of results plus the total number of matching rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub count: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, count: i64) -> Self {
        Self { data, count }
    }

    /// A complete, unpaginated list
    pub fn all(data: Vec<T>) -> Self {
        let count = data.len() as i64;
        Self { data, count }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            count: self.count,
        }
    }
}

/// Generic message body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Offset pagination query (`?skip=0&limit=100`)
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

impl Pagination {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.skip < 0 {
            return Err(DomainError::invalid_field("skip", "must not be negative"));
        }
        if self.limit < 0 {
            return Err(DomainError::invalid_field("limit", "must not be negative"));
        }
        Ok(())
    }
}
