use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewStore, Store};
use crate::database::repository::StoreRepository;

const COLUMNS: &str = "id, owner_id, name, description, created_at, updated_at";

pub struct PgStoreRepository {
    pool: PgPool,
}

impl PgStoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreRepository for PgStoreRepository {
    async fn create(&self, store: NewStore) -> Result<Store, DatabaseError> {
        let query = format!(
            "INSERT INTO stores (owner_id, name, description, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, Store>(&query)
            .bind(store.owner_id)
            .bind(&store.name)
            .bind(&store.description)
            .bind(store.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "store"))
    }

    async fn find_by_name(&self, name: &str) -> Result<Store, DatabaseError> {
        let query = format!("SELECT {COLUMNS} FROM stores WHERE name = $1 LIMIT 1");

        sqlx::query_as::<_, Store>(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::NotFound("store"))
    }

    async fn find_owned(&self, id: i64, owner_id: i64) -> Result<Store, DatabaseError> {
        let query = format!("SELECT {COLUMNS} FROM stores WHERE id = $1 AND owner_id = $2");

        sqlx::query_as::<_, Store>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::NotFound("store"))
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Store>, DatabaseError> {
        let query = format!("SELECT {COLUMNS} FROM stores WHERE owner_id = $1 ORDER BY id");

        let stores = sqlx::query_as::<_, Store>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(stores)
    }

    async fn update(&self, store: &Store) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE stores
             SET name = $1, description = $2, updated_at = $3
             WHERE id = $4 AND owner_id = $5",
        )
        .bind(&store.name)
        .bind(&store.description)
        .bind(store.updated_at)
        .bind(store.id)
        .bind(store.owner_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "store"))?;

        if result.rows_affected() < 1 {
            return Err(DatabaseError::NotFound("store"));
        }
        Ok(())
    }

    async fn delete(&self, id: i64, owner_id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM stores WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() < 1 {
            return Err(DatabaseError::NotFound("store"));
        }
        Ok(())
    }
}
