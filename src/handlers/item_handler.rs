//! Item Handler

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{CurrentUser, OperationContext};
use crate::error::AppError;
use crate::model::{Item, ItemCreate, ItemUpdate};
use crate::repository::ItemRepository;

/// Handler for item writes
pub struct ItemHandler {
    pool: PgPool,
}

impl ItemHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        input: ItemCreate,
        user: &CurrentUser,
        context: &OperationContext,
    ) -> Result<Item, AppError> {
        input.validate()?;

        let item = Item::new(input, user.id);

        let mut conn = self.pool.acquire().await?;
        ItemRepository::insert(&mut conn, &item).await?;

        tracing::info!(
            item_id = %item.id,
            owner_id = %item.owner_id,
            correlation_id = ?context.correlation_id,
            "Item created"
        );

        Ok(item)
    }

    pub async fn update(
        &self,
        item_id: Uuid,
        changes: ItemUpdate,
        user: &CurrentUser,
        context: &OperationContext,
    ) -> Result<Item, AppError> {
        changes.validate()?;

        let mut tx = self.pool.begin().await?;

        let mut item = ItemRepository::find_by_id_for_update(&mut tx, item_id)
            .await?
            .ok_or(AppError::ItemNotFound(item_id))?;

        item.ensure_access(user)?;
        item.apply_update(changes)?;
        ItemRepository::update(&mut tx, &item).await?;

        tx.commit().await?;

        tracing::info!(
            item_id = %item.id,
            correlation_id = ?context.correlation_id,
            "Item updated"
        );

        Ok(item)
    }

    pub async fn delete(
        &self,
        item_id: Uuid,
        user: &CurrentUser,
        context: &OperationContext,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let item = ItemRepository::find_by_id_for_update(&mut tx, item_id)
            .await?
            .ok_or(AppError::ItemNotFound(item_id))?;

        item.ensure_access(user)?;
        ItemRepository::delete(&mut tx, item_id).await?;

        tx.commit().await?;

        tracing::info!(
            item_id = %item_id,
            deleted_by = %user.id,
            correlation_id = ?context.correlation_id,
            "Item deleted"
        );

        Ok(())
    }
}
