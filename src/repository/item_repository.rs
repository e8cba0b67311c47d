use sqlx::PgConnection;
use uuid::Uuid;

use crate::model::Item;

/// Repository for the `items` table
pub struct ItemRepository;

impl ItemRepository {
    pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Item>, sqlx::Error> {
        sqlx::query_as::<_, Item>(
            "SELECT id, title, description, owner_id FROM items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
    }

    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Item>, sqlx::Error> {
        sqlx::query_as::<_, Item>(
            "SELECT id, title, description, owner_id FROM items WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
    }

    /// Page of items, restricted to one owner when `owner_id` is set
    pub async fn list(
        conn: &mut PgConnection,
        owner_id: Option<Uuid>,
        skip: i64,
        limit: i64,
    ) -> Result<(Vec<Item>, i64), sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM items WHERE $1::uuid IS NULL OR owner_id = $1",
        )
        .bind(owner_id)
        .fetch_one(&mut *conn)
        .await?;

        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, title, description, owner_id
            FROM items
            WHERE $1::uuid IS NULL OR owner_id = $1
            ORDER BY title, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(&mut *conn)
        .await?;

        Ok((items, count))
    }

    pub async fn insert(conn: &mut PgConnection, item: &Item) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO items (id, title, description, owner_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(item.id)
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.owner_id)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub async fn update(conn: &mut PgConnection, item: &Item) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE items SET title = $2, description = $3 WHERE id = $1")
            .bind(item.id)
            .bind(&item.title)
            .bind(&item.description)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
