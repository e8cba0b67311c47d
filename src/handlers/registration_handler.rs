//! Registration Handler
//!
//! Registers and unregisters the caller for events.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{is_foreign_key_violation, is_unique_violation};
use crate::domain::{CurrentUser, DomainError, OperationContext};
use crate::error::AppError;
use crate::model::EventRegistration;
use crate::repository::{EventRepository, RegistrationRepository};

/// Handler for event registrations
pub struct RegistrationHandler {
    pool: PgPool,
}

impl RegistrationHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register the caller for `event_id`
    pub async fn register(
        &self,
        event_id: Uuid,
        user: &CurrentUser,
        context: &OperationContext,
    ) -> Result<EventRegistration, AppError> {
        let mut tx = self.pool.begin().await?;

        if !EventRepository::exists(&mut tx, event_id).await? {
            return Err(AppError::EventNotFound(event_id));
        }

        if RegistrationRepository::find(&mut tx, user.id, event_id)
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadyRegistered.into());
        }

        let registration = EventRegistration::new(user.id, event_id);

        // A concurrent request may still win between the check and the insert
        RegistrationRepository::insert(&mut tx, &registration)
            .await
            .map_err(|e| registration_insert_error(e, event_id))?;

        tx.commit().await?;

        tracing::info!(
            registration_id = %registration.id,
            event_id = %event_id,
            user_id = %user.id,
            correlation_id = ?context.correlation_id,
            "User registered for event"
        );

        Ok(registration)
    }

    /// Remove the caller's registration for `event_id`
    pub async fn unregister(
        &self,
        event_id: Uuid,
        user: &CurrentUser,
        context: &OperationContext,
    ) -> Result<EventRegistration, AppError> {
        let mut conn = self.pool.acquire().await?;

        let registration = RegistrationRepository::delete(&mut conn, user.id, event_id)
            .await?
            .ok_or(AppError::RegistrationNotFound(event_id))?;

        tracing::info!(
            registration_id = %registration.id,
            event_id = %event_id,
            user_id = %user.id,
            correlation_id = ?context.correlation_id,
            "User unregistered from event"
        );

        Ok(registration)
    }
}

/// Translate constraint violations raised by the registration insert
pub fn registration_insert_error(err: sqlx::Error, event_id: Uuid) -> AppError {
    if is_unique_violation(&err) {
        DomainError::AlreadyRegistered.into()
    } else if is_foreign_key_violation(&err) {
        // Event deleted after the existence check
        AppError::EventNotFound(event_id)
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_error_passes_through_other_errors() {
        let err = registration_insert_error(sqlx::Error::RowNotFound, Uuid::new_v4());
        assert!(matches!(err, AppError::Database(sqlx::Error::RowNotFound)));
    }
}
