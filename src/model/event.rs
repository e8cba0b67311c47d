//! Event entity
//!
//! An event is organized by exactly one user. Only the organizer may update
//! it; the organizer or a superuser may delete it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::validation::{check_length, check_optional_length, MAX_TEXT_LEN};
use crate::domain::{CurrentUser, DomainError, FieldUpdate};

/// Row of the `events` table
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: String,
    pub organizer_id: Uuid,
}

impl Event {
    /// Build a new event organized by `organizer_id`
    pub fn new(input: EventCreate, organizer_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            date: input.date,
            location: input.location,
            organizer_id,
        }
    }

    /// Fail unless `user` organizes this event
    pub fn ensure_organizer(&self, user: &CurrentUser) -> Result<(), DomainError> {
        if self.organizer_id != user.id {
            return Err(DomainError::NotOrganizer);
        }
        Ok(())
    }

    /// Fail unless `user` organizes this event or is a superuser
    pub fn ensure_can_delete(&self, user: &CurrentUser) -> Result<(), DomainError> {
        if self.organizer_id != user.id && !user.is_superuser {
            return Err(DomainError::NotOrganizer);
        }
        Ok(())
    }

    /// Apply the supplied fields. `organizer_id` is not updatable.
    pub fn apply_update(&mut self, changes: EventUpdate) -> Result<(), DomainError> {
        changes.title.apply_required("title", &mut self.title)?;
        changes.description.apply_optional(&mut self.description);
        changes.date.apply_required("date", &mut self.date)?;
        changes.location.apply_required("location", &mut self.location)?;
        Ok(())
    }
}

/// Event as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPublic {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: String,
    pub organizer_id: Uuid,
}

impl From<Event> for EventPublic {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            organizer_id: event.organizer_id,
        }
    }
}

/// Event creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct EventCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "super::datetime::deserialize")]
    pub date: DateTime<Utc>,
    pub location: String,
}

impl EventCreate {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_length("title", &self.title, 1, MAX_TEXT_LEN)?;
        check_optional_length("description", self.description.as_deref(), MAX_TEXT_LEN)?;
        check_length("location", &self.location, 1, MAX_TEXT_LEN)
    }
}

/// Partial event update payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventUpdate {
    #[serde(default)]
    pub title: FieldUpdate<String>,
    #[serde(default)]
    pub description: FieldUpdate<String>,
    #[serde(default, deserialize_with = "super::datetime::deserialize_update")]
    pub date: FieldUpdate<DateTime<Utc>>,
    #[serde(default)]
    pub location: FieldUpdate<String>,
}

impl EventUpdate {
    pub fn validate(&self) -> Result<(), DomainError> {
        self.title.reject_null("title")?;
        self.date.reject_null("date")?;
        self.location.reject_null("location")?;

        if let Some(title) = self.title.value() {
            check_length("title", title, 1, MAX_TEXT_LEN)?;
        }
        if let Some(description) = self.description.value() {
            check_optional_length("description", Some(description.as_str()), MAX_TEXT_LEN)?;
        }
        if let Some(location) = self.location.value() {
            check_length("location", location, 1, MAX_TEXT_LEN)?;
        }
        Ok(())
    }

    /// Names of the fields present in the request
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if !self.title.is_missing() {
            fields.push("title");
        }
        if !self.description.is_missing() {
            fields.push("description");
        }
        if !self.date.is_missing() {
            fields.push("date");
        }
        if !self.location.is_missing() {
            fields.push("location");
        }
        fields
    }
}
