//! Event registration entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Row of the `event_registrations` table. Also the public projection.
///
/// At most one registration exists per (user_id, event_id).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct EventRegistration {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub registration_date: DateTime<Utc>,
}

impl EventRegistration {
    pub fn new(user_id: Uuid, event_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            event_id,
            registration_date: Utc::now(),
        }
    }
}
