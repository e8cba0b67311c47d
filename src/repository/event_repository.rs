use sqlx::PgConnection;
use uuid::Uuid;

use crate::model::Event;

/// Repository for the `events` table
pub struct EventRepository;

impl EventRepository {
    pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, date, location, organizer_id
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
    }

    /// Same as [`Self::find_by_id`], locking the row until the transaction ends
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, date, location, organizer_id
            FROM events
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
    }

    pub async fn exists(conn: &mut PgConnection, id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM events WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *conn)
            .await
    }

    /// Page of all events ordered by date, plus the total count
    pub async fn list(
        conn: &mut PgConnection,
        skip: i64,
        limit: i64,
    ) -> Result<(Vec<Event>, i64), sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&mut *conn)
            .await?;

        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, date, location, organizer_id
            FROM events
            ORDER BY date, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&mut *conn)
        .await?;

        Ok((events, count))
    }

    /// Events the user holds a registration for, oldest registration first
    pub async fn list_registered_by(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Vec<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT e.id, e.title, e.description, e.date, e.location, e.organizer_id
            FROM events e
            JOIN event_registrations r ON r.event_id = e.id
            WHERE r.user_id = $1
            ORDER BY r.registration_date, e.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await
    }

    pub async fn insert(conn: &mut PgConnection, event: &Event) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO events (id, title, description, date, location, organizer_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(event.organizer_id)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Persist the mutable fields. `organizer_id` is never written.
    pub async fn update(conn: &mut PgConnection, event: &Event) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE events
            SET title = $2, description = $3, date = $4, location = $5
            WHERE id = $1
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Delete an event. Its registrations cascade.
    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
