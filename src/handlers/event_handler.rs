//! Event Handler
//!
//! Create, update and delete events. Each write runs in its own transaction.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{CurrentUser, OperationContext};
use crate::error::AppError;
use crate::model::{Event, EventCreate, EventUpdate};
use crate::repository::{EventRepository, RegistrationRepository};

/// Handler for event writes
pub struct EventHandler {
    pool: PgPool,
}

impl EventHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an event organized by the caller
    pub async fn create(
        &self,
        input: EventCreate,
        user: &CurrentUser,
        context: &OperationContext,
    ) -> Result<Event, AppError> {
        input.validate()?;

        let event = Event::new(input, user.id);

        let mut conn = self.pool.acquire().await?;
        EventRepository::insert(&mut conn, &event).await?;

        tracing::info!(
            event_id = %event.id,
            organizer_id = %event.organizer_id,
            correlation_id = ?context.correlation_id,
            "Event created"
        );

        Ok(event)
    }

    /// Apply a partial update. Only the organizer may update.
    pub async fn update(
        &self,
        event_id: Uuid,
        changes: EventUpdate,
        user: &CurrentUser,
        context: &OperationContext,
    ) -> Result<Event, AppError> {
        changes.validate()?;

        let mut tx = self.pool.begin().await?;

        let mut event = EventRepository::find_by_id_for_update(&mut tx, event_id)
            .await?
            .ok_or(AppError::EventNotFound(event_id))?;

        event.ensure_organizer(user)?;

        let changed_fields = changes.changed_fields();
        if changed_fields.is_empty() {
            return Ok(event);
        }

        event.apply_update(changes)?;
        EventRepository::update(&mut tx, &event).await?;

        tx.commit().await?;

        tracing::info!(
            event_id = %event.id,
            changed_fields = ?changed_fields,
            correlation_id = ?context.correlation_id,
            "Event updated"
        );

        Ok(event)
    }

    /// Delete an event and, by cascade, its registrations.
    /// The organizer or a superuser may delete.
    pub async fn delete(
        &self,
        event_id: Uuid,
        user: &CurrentUser,
        context: &OperationContext,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let event = EventRepository::find_by_id_for_update(&mut tx, event_id)
            .await?
            .ok_or(AppError::EventNotFound(event_id))?;

        event.ensure_can_delete(user)?;

        let registrations = RegistrationRepository::count_for_event(&mut tx, event_id).await?;
        EventRepository::delete(&mut tx, event_id).await?;

        tx.commit().await?;

        tracing::info!(
            event_id = %event_id,
            deleted_by = %user.id,
            registrations_removed = registrations,
            correlation_id = ?context.correlation_id,
            "Event deleted"
        );

        Ok(())
    }
}
