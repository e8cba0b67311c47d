//! User endpoints

use axum::{
    extract::{Extension, State},
    routing::{get, patch, post},
    Json, Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{CurrentUser, DomainError, OperationContext};
use crate::error::AppError;
use crate::handlers::UserHandler;
use crate::model::{
    Message, Page, Pagination, UpdatePassword, UserCreate, UserPublic, UserRegister, UserUpdate,
    UserUpdateMe,
};
use crate::repository::UserRepository;

use super::extract::{AppJson, AppPath, AppQuery};
use super::middleware::require_user;

pub fn router() -> Router<PgPool> {
    Router::new()
        .route("/users/", get(list_users).post(create_user))
        .route("/users/signup", post(signup))
        .route(
            "/users/me",
            get(read_me).patch(update_me).delete(delete_me),
        )
        .route("/users/me/password", patch(update_password_me))
        .route(
            "/users/:id",
            get(read_user).patch(update_user).delete(delete_user),
        )
}

/// POST /users/signup
async fn signup(
    State(pool): State<PgPool>,
    Extension(context): Extension<OperationContext>,
    AppJson(input): AppJson<UserRegister>,
) -> Result<Json<UserPublic>, AppError> {
    let user = UserHandler::new(pool).signup(input, &context).await?;
    Ok(Json(user))
}

/// GET /users/
async fn list_users(
    State(pool): State<PgPool>,
    user: Option<Extension<CurrentUser>>,
    AppQuery(page): AppQuery<Pagination>,
) -> Result<Json<Page<UserPublic>>, AppError> {
    let user = require_user(user)?;
    if !user.is_superuser {
        return Err(DomainError::SuperuserRequired.into());
    }
    page.validate()?;

    let mut conn = pool.acquire().await?;
    let (users, count) = UserRepository::list(&mut conn, page.skip, page.limit).await?;

    Ok(Json(Page::new(users, count).map(UserPublic::from)))
}

/// POST /users/
async fn create_user(
    State(pool): State<PgPool>,
    Extension(context): Extension<OperationContext>,
    user: Option<Extension<CurrentUser>>,
    AppJson(input): AppJson<UserCreate>,
) -> Result<Json<UserPublic>, AppError> {
    let actor = require_user(user)?;

    let created = UserHandler::new(pool).create(input, &actor, &context).await?;

    Ok(Json(created))
}

/// GET /users/me
async fn read_me(user: Option<Extension<CurrentUser>>) -> Result<Json<UserPublic>, AppError> {
    let user = require_user(user)?;
    Ok(Json(user.to_public()))
}

/// PATCH /users/me
async fn update_me(
    State(pool): State<PgPool>,
    Extension(context): Extension<OperationContext>,
    user: Option<Extension<CurrentUser>>,
    AppJson(changes): AppJson<UserUpdateMe>,
) -> Result<Json<UserPublic>, AppError> {
    let actor = require_user(user)?;

    let updated = UserHandler::new(pool)
        .update_me(changes, &actor, &context)
        .await?;

    Ok(Json(updated))
}

/// PATCH /users/me/password
async fn update_password_me(
    State(pool): State<PgPool>,
    Extension(context): Extension<OperationContext>,
    user: Option<Extension<CurrentUser>>,
    AppJson(input): AppJson<UpdatePassword>,
) -> Result<Json<Message>, AppError> {
    let actor = require_user(user)?;

    UserHandler::new(pool)
        .update_password(input, &actor, &context)
        .await?;

    Ok(Json(Message::new("Password updated successfully")))
}

/// DELETE /users/me
async fn delete_me(
    State(pool): State<PgPool>,
    Extension(context): Extension<OperationContext>,
    user: Option<Extension<CurrentUser>>,
) -> Result<Json<Message>, AppError> {
    let actor = require_user(user)?;

    UserHandler::new(pool).delete_me(&actor, &context).await?;

    Ok(Json(Message::new("User deleted successfully")))
}

/// GET /users/:id
async fn read_user(
    State(pool): State<PgPool>,
    user: Option<Extension<CurrentUser>>,
    AppPath(user_id): AppPath<Uuid>,
) -> Result<Json<UserPublic>, AppError> {
    let actor = require_user(user)?;

    if actor.id == user_id {
        return Ok(Json(actor.to_public()));
    }
    if !actor.is_superuser {
        return Err(DomainError::SuperuserRequired.into());
    }

    let mut conn = pool.acquire().await?;
    let found = UserRepository::find_by_id(&mut conn, user_id)
        .await?
        .ok_or_else(|| AppError::UserNotFound(user_id.to_string()))?;

    Ok(Json(found.into()))
}

/// PATCH /users/:id
async fn update_user(
    State(pool): State<PgPool>,
    Extension(context): Extension<OperationContext>,
    user: Option<Extension<CurrentUser>>,
    AppPath(user_id): AppPath<Uuid>,
    AppJson(changes): AppJson<UserUpdate>,
) -> Result<Json<UserPublic>, AppError> {
    let actor = require_user(user)?;

    let updated = UserHandler::new(pool)
        .update(user_id, changes, &actor, &context)
        .await?;

    Ok(Json(updated))
}

/// DELETE /users/:id
async fn delete_user(
    State(pool): State<PgPool>,
    Extension(context): Extension<OperationContext>,
    user: Option<Extension<CurrentUser>>,
    AppPath(user_id): AppPath<Uuid>,
) -> Result<Json<Message>, AppError> {
    let actor = require_user(user)?;

    UserHandler::new(pool)
        .delete(user_id, &actor, &context)
        .await?;

    Ok(Json(Message::new("User deleted successfully")))
}
