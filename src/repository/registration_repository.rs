use sqlx::PgConnection;
use uuid::Uuid;

use crate::model::EventRegistration;

/// Repository for the `event_registrations` table
pub struct RegistrationRepository;

impl RegistrationRepository {
    pub async fn find(
        conn: &mut PgConnection,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<EventRegistration>, sqlx::Error> {
        sqlx::query_as::<_, EventRegistration>(
            r#"
            SELECT id, user_id, event_id, registration_date
            FROM event_registrations
            WHERE user_id = $1 AND event_id = $2
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&mut *conn)
        .await
    }

    /// Insert a registration. A duplicate (user_id, event_id) pair fails
    /// with a unique violation.
    pub async fn insert(
        conn: &mut PgConnection,
        registration: &EventRegistration,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO event_registrations (id, user_id, event_id, registration_date)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(registration.id)
        .bind(registration.user_id)
        .bind(registration.event_id)
        .bind(registration.registration_date)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Delete the registration of `user_id` for `event_id`, returning it
    pub async fn delete(
        conn: &mut PgConnection,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<EventRegistration>, sqlx::Error> {
        sqlx::query_as::<_, EventRegistration>(
            r#"
            DELETE FROM event_registrations
            WHERE user_id = $1 AND event_id = $2
            RETURNING id, user_id, event_id, registration_date
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&mut *conn)
        .await
    }

    pub async fn count_for_event(conn: &mut PgConnection, event_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM event_registrations WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&mut *conn)
            .await
    }
}
