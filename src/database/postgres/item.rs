use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Item, NewItem};
use crate::database::repository::ItemRepository;

const COLUMNS: &str = "id, store_id, name, description, quantity, created_at, updated_at";

pub struct PgItemRepository {
    pool: PgPool,
}

impl PgItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn create(&self, item: NewItem) -> Result<Item, DatabaseError> {
        let query = format!(
            "INSERT INTO items (store_id, name, description, quantity, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, Item>(&query)
            .bind(item.store_id)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "item"))
    }

    async fn find_by_name(&self, store_id: i64, name: &str) -> Result<Item, DatabaseError> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE store_id = $1 AND name = $2");

        sqlx::query_as::<_, Item>(&query)
            .bind(store_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::NotFound("item"))
    }

    async fn find_owned(&self, id: i64, store_id: i64) -> Result<Item, DatabaseError> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1 AND store_id = $2");

        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(store_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::NotFound("item"))
    }

    async fn list_by_store(&self, store_id: i64) -> Result<Vec<Item>, DatabaseError> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE store_id = $1 ORDER BY id");

        let items = sqlx::query_as::<_, Item>(&query)
            .bind(store_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn update(&self, item: &Item) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE items
             SET name = $1, description = $2, quantity = $3, updated_at = $4
             WHERE id = $5 AND store_id = $6",
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.quantity)
        .bind(item.updated_at)
        .bind(item.id)
        .bind(item.store_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "item"))?;

        if result.rows_affected() < 1 {
            return Err(DatabaseError::NotFound("item"));
        }
        Ok(())
    }

    async fn add_quantity(
        &self,
        id: i64,
        store_id: i64,
        delta: i64,
        at: DateTime<Utc>,
    ) -> Result<Item, DatabaseError> {
        let query = format!(
            "UPDATE items
             SET quantity = quantity + $1, updated_at = $2
             WHERE id = $3 AND store_id = $4
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, Item>(&query)
            .bind(delta)
            .bind(at)
            .bind(id)
            .bind(store_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "item"))?
            .ok_or(DatabaseError::NotFound("item"))
    }

    async fn delete(&self, id: i64, store_id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() < 1 {
            return Err(DatabaseError::NotFound("item"));
        }
        Ok(())
    }
}
