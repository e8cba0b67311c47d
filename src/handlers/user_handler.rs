//! User Handler
//!
//! Account creation, profile and password updates, account deletion.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::domain::password::{hash_password, verify_password};
use crate::domain::validation::normalize_email;
use crate::domain::{CurrentUser, DomainError, FieldUpdate, OperationContext};
use crate::error::AppError;
use crate::model::{
    UpdatePassword, User, UserCreate, UserPublic, UserRegister, UserUpdate, UserUpdateMe,
};
use crate::repository::UserRepository;

/// Handler for user writes
pub struct UserHandler {
    pool: PgPool,
}

impl UserHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open sign-up: always an active, non-superuser account
    pub async fn signup(
        &self,
        input: UserRegister,
        context: &OperationContext,
    ) -> Result<UserPublic, AppError> {
        self.insert_user(input.into(), context).await
    }

    /// Create any kind of user. Superusers only.
    pub async fn create(
        &self,
        input: UserCreate,
        actor: &CurrentUser,
        context: &OperationContext,
    ) -> Result<UserPublic, AppError> {
        if !actor.is_superuser {
            return Err(DomainError::SuperuserRequired.into());
        }
        self.insert_user(input, context).await
    }

    async fn insert_user(
        &self,
        input: UserCreate,
        context: &OperationContext,
    ) -> Result<UserPublic, AppError> {
        input.validate()?;

        let hashed = hash_blocking(input.password.clone()).await?;
        let user = User::new(input, hashed);

        let mut tx = self.pool.begin().await?;

        if UserRepository::find_by_email(&mut tx, &user.email)
            .await?
            .is_some()
        {
            return Err(DomainError::EmailTaken.into());
        }

        UserRepository::insert(&mut tx, &user)
            .await
            .map_err(email_conflict)?;

        tx.commit().await?;

        tracing::info!(
            user_id = %user.id,
            is_superuser = user.is_superuser,
            correlation_id = ?context.correlation_id,
            "User created"
        );

        Ok(user.into())
    }

    /// Partial update of the caller's own profile
    pub async fn update_me(
        &self,
        changes: UserUpdateMe,
        actor: &CurrentUser,
        context: &OperationContext,
    ) -> Result<UserPublic, AppError> {
        changes.validate()?;

        let mut tx = self.pool.begin().await?;

        let mut user = UserRepository::find_by_id(&mut tx, actor.id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(actor.id.to_string()))?;

        if let Some(email) = changes.email.value() {
            ensure_email_free(&mut tx, email, user.id).await?;
        }

        user.apply_update(changes)?;
        UserRepository::update(&mut tx, &user)
            .await
            .map_err(email_conflict)?;

        tx.commit().await?;

        tracing::info!(
            user_id = %user.id,
            correlation_id = ?context.correlation_id,
            "User profile updated"
        );

        Ok(user.into())
    }

    /// Partial update of any user. Superusers only.
    pub async fn update(
        &self,
        user_id: Uuid,
        mut changes: UserUpdate,
        actor: &CurrentUser,
        context: &OperationContext,
    ) -> Result<UserPublic, AppError> {
        if !actor.is_superuser {
            return Err(DomainError::SuperuserRequired.into());
        }
        changes.validate()?;

        let hashed = match std::mem::take(&mut changes.password) {
            FieldUpdate::Value(password) => Some(hash_blocking(password).await?),
            _ => None,
        };
        let password_changed = hashed.is_some();

        let mut tx = self.pool.begin().await?;

        let mut user = UserRepository::find_by_id(&mut tx, user_id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(user_id.to_string()))?;

        if let Some(email) = changes.email.value() {
            ensure_email_free(&mut tx, email, user.id).await?;
        }

        user.apply_admin_update(changes, hashed)?;
        UserRepository::update(&mut tx, &user)
            .await
            .map_err(email_conflict)?;

        tx.commit().await?;

        tracing::info!(
            user_id = %user.id,
            updated_by = %actor.id,
            is_active = user.is_active,
            is_superuser = user.is_superuser,
            password_changed,
            correlation_id = ?context.correlation_id,
            "User updated"
        );

        Ok(user.into())
    }

    /// Change the caller's password after verifying the current one
    pub async fn update_password(
        &self,
        input: UpdatePassword,
        actor: &CurrentUser,
        context: &OperationContext,
    ) -> Result<(), AppError> {
        input.validate()?;

        let mut tx = self.pool.begin().await?;

        let mut user = UserRepository::find_by_id(&mut tx, actor.id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(actor.id.to_string()))?;

        let verified =
            verify_blocking(input.current_password.clone(), user.hashed_password.clone()).await?;
        if !verified {
            return Err(DomainError::IncorrectPassword.into());
        }
        if input.current_password == input.new_password {
            return Err(DomainError::PasswordUnchanged.into());
        }

        user.hashed_password = hash_blocking(input.new_password).await?;
        UserRepository::update(&mut tx, &user).await?;

        tx.commit().await?;

        tracing::info!(
            user_id = %user.id,
            correlation_id = ?context.correlation_id,
            "User password changed"
        );

        Ok(())
    }

    /// Delete another user. Superusers only, and never themselves.
    pub async fn delete(
        &self,
        user_id: Uuid,
        actor: &CurrentUser,
        context: &OperationContext,
    ) -> Result<(), AppError> {
        if !actor.is_superuser {
            return Err(DomainError::SuperuserRequired.into());
        }
        if user_id == actor.id {
            return Err(DomainError::SuperuserSelfDelete.into());
        }
        self.delete_user(user_id, actor, context).await
    }

    /// Delete the caller's own account. Not available to superusers.
    pub async fn delete_me(
        &self,
        actor: &CurrentUser,
        context: &OperationContext,
    ) -> Result<(), AppError> {
        if actor.is_superuser {
            return Err(DomainError::SuperuserSelfDelete.into());
        }
        self.delete_user(actor.id, actor, context).await
    }

    async fn delete_user(
        &self,
        user_id: Uuid,
        actor: &CurrentUser,
        context: &OperationContext,
    ) -> Result<(), AppError> {
        let mut conn = self.pool.acquire().await?;

        // Items, organized events and registrations cascade
        if !UserRepository::delete(&mut conn, user_id).await? {
            return Err(AppError::UserNotFound(user_id.to_string()));
        }

        tracing::info!(
            user_id = %user_id,
            deleted_by = %actor.id,
            correlation_id = ?context.correlation_id,
            "User deleted"
        );

        Ok(())
    }
}

/// Fail with `EmailTaken` when `email` belongs to a user other than `user_id`
async fn ensure_email_free(
    conn: &mut PgConnection,
    email: &str,
    user_id: Uuid,
) -> Result<(), AppError> {
    match UserRepository::find_by_email(conn, &normalize_email(email)).await? {
        Some(existing) if existing.id != user_id => Err(DomainError::EmailTaken.into()),
        _ => Ok(()),
    }
}

async fn hash_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hash task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))
}

async fn verify_blocking(password: String, hashed: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hashed))
        .await
        .map_err(|e| AppError::Internal(format!("Password verify task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Stored password hash unreadable: {}", e)))
}

fn email_conflict(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err) {
        DomainError::EmailTaken.into()
    } else {
        err.into()
    }
}
