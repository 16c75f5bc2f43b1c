//! Storage contracts for the three tables.
//!
//! Lookups return `DatabaseError::NotFound` when no row matches; every other
//! driver fault comes back as `DatabaseError::Sqlx`. Each call commits on its
//! own, there are no cross-call transactions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::database::manager::DatabaseError;
use crate::database::models::{Account, Item, NewAccount, NewItem, NewStore, Store};

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create(&self, account: NewAccount) -> Result<Account, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Account, DatabaseError>;

    async fn find_by_email(&self, email: &str) -> Result<Account, DatabaseError>;

    /// Full overwrite of name, password hash, email, address and updated_at.
    async fn update(&self, account: &Account) -> Result<(), DatabaseError>;

    /// Removes the account together with its stores and their items.
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn create(&self, store: NewStore) -> Result<Store, DatabaseError>;

    async fn find_by_name(&self, name: &str) -> Result<Store, DatabaseError>;

    /// Fetch a store only if `owner_id` owns it.
    async fn find_owned(&self, id: i64, owner_id: i64) -> Result<Store, DatabaseError>;

    /// All stores of an owner, oldest first. Empty when there are none.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Store>, DatabaseError>;

    async fn update(&self, store: &Store) -> Result<(), DatabaseError>;

    async fn delete(&self, id: i64, owner_id: i64) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn create(&self, item: NewItem) -> Result<Item, DatabaseError>;

    /// Name lookup scoped to one store.
    async fn find_by_name(&self, store_id: i64, name: &str) -> Result<Item, DatabaseError>;

    async fn find_owned(&self, id: i64, store_id: i64) -> Result<Item, DatabaseError>;

    async fn list_by_store(&self, store_id: i64) -> Result<Vec<Item>, DatabaseError>;

    async fn update(&self, item: &Item) -> Result<(), DatabaseError>;

    /// Atomic `quantity = quantity + delta`, returning the updated row.
    async fn add_quantity(
        &self,
        id: i64,
        store_id: i64,
        delta: i64,
        at: DateTime<Utc>,
    ) -> Result<Item, DatabaseError>;

    async fn delete(&self, id: i64, store_id: i64) -> Result<(), DatabaseError>;
}
