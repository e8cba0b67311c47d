use sqlx::PgConnection;
use uuid::Uuid;

use crate::model::User;

/// Repository for the `users` table
pub struct UserRepository;

impl UserRepository {
    pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, is_active, is_superuser, full_name, hashed_password
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
    }

    pub async fn find_by_email(
        conn: &mut PgConnection,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, is_active, is_superuser, full_name, hashed_password
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&mut *conn)
        .await
    }

    /// Page of users ordered by email, plus the total count
    pub async fn list(
        conn: &mut PgConnection,
        skip: i64,
        limit: i64,
    ) -> Result<(Vec<User>, i64), sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *conn)
            .await?;

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, is_active, is_superuser, full_name, hashed_password
            FROM users
            ORDER BY email
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&mut *conn)
        .await?;

        Ok((users, count))
    }

    pub async fn insert(conn: &mut PgConnection, user: &User) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, is_active, is_superuser, full_name, hashed_password)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(user.is_active)
        .bind(user.is_superuser)
        .bind(&user.full_name)
        .bind(&user.hashed_password)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Persist every mutable column. A taken email fails with a unique violation.
    pub async fn update(conn: &mut PgConnection, user: &User) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET email = $2, is_active = $3, is_superuser = $4, full_name = $5,
                hashed_password = $6
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(user.is_active)
        .bind(user.is_superuser)
        .bind(&user.full_name)
        .bind(&user.hashed_password)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Delete a user. Items, organized events and registrations cascade.
    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
