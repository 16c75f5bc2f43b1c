use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Account, NewAccount};
use crate::database::repository::AccountRepository;

const COLUMNS: &str = "id, name, password_hash, email, address, created_at, updated_at";

pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, DatabaseError> {
        let query = format!(
            "INSERT INTO accounts (name, password_hash, email, address, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, Account>(&query)
            .bind(&account.name)
            .bind(&account.password_hash)
            .bind(&account.email)
            .bind(&account.address)
            .bind(account.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "account"))
    }

    async fn find_by_id(&self, id: i64) -> Result<Account, DatabaseError> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");

        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::NotFound("account"))
    }

    async fn find_by_email(&self, email: &str) -> Result<Account, DatabaseError> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE email = $1");

        sqlx::query_as::<_, Account>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::NotFound("account"))
    }

    async fn update(&self, account: &Account) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE accounts
             SET name = $1, password_hash = $2, email = $3, address = $4, updated_at = $5
             WHERE id = $6",
        )
        .bind(&account.name)
        .bind(&account.password_hash)
        .bind(&account.email)
        .bind(&account.address)
        .bind(account.updated_at)
        .bind(account.id)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "account"))?;

        if result.rows_affected() < 1 {
            return Err(DatabaseError::NotFound("account"));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        // stores and items go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() < 1 {
            return Err(DatabaseError::NotFound("account"));
        }
        Ok(())
    }
}
