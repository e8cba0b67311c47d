//! Database module
//!
//! Connection, migration and seeding utilities.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;

use crate::config::FirstSuperuser;
use crate::domain::password::hash_password;
use crate::domain::validation::normalize_email;
use crate::error::AppError;
use crate::model::{User, UserCreate};
use crate::repository::UserRepository;

/// SQL migrations under `migrations/`, embedded at compile time
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// SQLSTATE unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Apply pending migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let required_tables = ["users", "items", "events", "event_registrations"];

    for table in required_tables {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    Ok(true)
}

/// Create the configured superuser unless a user with that email exists
pub async fn ensure_first_superuser(
    pool: &PgPool,
    superuser: &FirstSuperuser,
) -> Result<(), AppError> {
    let mut conn = pool.acquire().await?;

    if UserRepository::find_by_email(&mut conn, &normalize_email(&superuser.email))
        .await?
        .is_some()
    {
        tracing::debug!(email = %superuser.email, "First superuser already present");
        return Ok(());
    }

    let input = UserCreate {
        email: superuser.email.clone(),
        password: superuser.password.clone(),
        is_active: true,
        is_superuser: true,
        full_name: None,
    };
    input.validate()?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;
    let user = User::new(input, hashed);

    match UserRepository::insert(&mut conn, &user).await {
        Ok(()) => {
            tracing::info!(user_id = %user.id, email = %user.email, "Created first superuser");
            Ok(())
        }
        // Another instance seeded it concurrently
        Err(e) if is_unique_violation(&e) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn has_sqlstate(err: &sqlx::Error, code: &str) -> bool {
    err.as_database_error()
        .and_then(|db_err| db_err.code())
        .map_or(false, |c| c == code)
}

/// Unique constraint violated
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    has_sqlstate(err, UNIQUE_VIOLATION)
}

/// Referenced row missing (e.g. parent deleted concurrently)
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    has_sqlstate(err, FOREIGN_KEY_VIOLATION)
}
