//! Item endpoints

use axum::{
    extract::{Extension, State},
    routing::get,
    Json, Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{CurrentUser, OperationContext};
use crate::error::AppError;
use crate::handlers::ItemHandler;
use crate::model::{ItemCreate, ItemPublic, ItemUpdate, Message, Page, Pagination};
use crate::repository::ItemRepository;

use super::extract::{AppJson, AppPath, AppQuery};
use super::middleware::require_user;

pub fn router() -> Router<PgPool> {
    Router::new()
        .route("/items/", get(list_items).post(create_item))
        .route(
            "/items/:id",
            get(read_item).put(update_item).delete(delete_item),
        )
}

/// GET /items/
///
/// Superusers see every item, everyone else only their own.
async fn list_items(
    State(pool): State<PgPool>,
    user: Option<Extension<CurrentUser>>,
    AppQuery(page): AppQuery<Pagination>,
) -> Result<Json<Page<ItemPublic>>, AppError> {
    let user = require_user(user)?;
    page.validate()?;

    let owner = (!user.is_superuser).then_some(user.id);

    let mut conn = pool.acquire().await?;
    let (items, count) = ItemRepository::list(&mut conn, owner, page.skip, page.limit).await?;

    Ok(Json(Page::new(items, count).map(ItemPublic::from)))
}

/// GET /items/:id
async fn read_item(
    State(pool): State<PgPool>,
    user: Option<Extension<CurrentUser>>,
    AppPath(item_id): AppPath<Uuid>,
) -> Result<Json<ItemPublic>, AppError> {
    let user = require_user(user)?;

    let mut conn = pool.acquire().await?;
    let item = ItemRepository::find_by_id(&mut conn, item_id)
        .await?
        .ok_or(AppError::ItemNotFound(item_id))?;

    item.ensure_access(&user)?;

    Ok(Json(item.into()))
}

/// POST /items/
async fn create_item(
    State(pool): State<PgPool>,
    Extension(context): Extension<OperationContext>,
    user: Option<Extension<CurrentUser>>,
    AppJson(input): AppJson<ItemCreate>,
) -> Result<Json<ItemPublic>, AppError> {
    let user = require_user(user)?;

    let item = ItemHandler::new(pool).create(input, &user, &context).await?;

    Ok(Json(item.into()))
}

/// PUT /items/:id
async fn update_item(
    State(pool): State<PgPool>,
    Extension(context): Extension<OperationContext>,
    user: Option<Extension<CurrentUser>>,
    AppPath(item_id): AppPath<Uuid>,
    AppJson(changes): AppJson<ItemUpdate>,
) -> Result<Json<ItemPublic>, AppError> {
    let user = require_user(user)?;

    let item = ItemHandler::new(pool)
        .update(item_id, changes, &user, &context)
        .await?;

    Ok(Json(item.into()))
}

/// DELETE /items/:id
async fn delete_item(
    State(pool): State<PgPool>,
    Extension(context): Extension<OperationContext>,
    user: Option<Extension<CurrentUser>>,
    AppPath(item_id): AppPath<Uuid>,
) -> Result<Json<Message>, AppError> {
    let user = require_user(user)?;

    ItemHandler::new(pool)
        .delete(item_id, &user, &context)
        .await?;

    Ok(Json(Message::new("Item deleted successfully")))
}
